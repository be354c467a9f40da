mod common;

use common::record;
use progress_core::{dedupe_by_id, LineRef, ProgressRecord, RecordId};
use serde_json::json;

#[test]
fn full_record_decodes_with_camel_case_fields() {
    let record = common::sales_data();
    assert_eq!(record.id, RecordId::new("rec-1"));
    assert_eq!(record.client_key, "krn:clnt:demo-company");
    assert_eq!(record.counts.done, 850);
    assert_eq!(record.total, Some(1000));
    assert!(!record.is_completed);
    assert_eq!(record.errors.len(), 2);
    assert_eq!(record.warnings.len(), 1);
}

#[test]
fn sparse_record_falls_back_to_defaults() {
    let record = record(json!({
        "_id": 7,
        "clientKrn": "krn:clnt:other",
        "filename": "sparse.csv",
        "email": null,
        "errors": null
    }));
    assert_eq!(record.id.as_str(), "7");
    assert_eq!(record.client_key, "krn:clnt:other");
    assert_eq!(record.email, "");
    assert_eq!(record.counts.failed, 0);
    assert_eq!(record.total, None);
    assert!(record.errors.is_empty());
    assert!(record.warnings.is_empty());
}

#[test]
fn legacy_scalar_line_becomes_single_occurrence() {
    let record = record(json!({
        "id": "x",
        "filename": "legacy.csv",
        "warnings": [{"message": "Odd value", "pattern": "ODD", "line": 4, "values": ["z"]}]
    }));
    let group = &record.warnings[0];
    assert_eq!(group.lines.len(), 1);
    assert_eq!(group.lines[0].line.as_ref().map(ToString::to_string), Some("4".to_string()));
    assert_eq!(group.lines[0].values, vec!["z"]);
}

#[test]
fn group_without_lines_has_no_occurrences() {
    let record = record(json!({
        "id": "x",
        "filename": "empty.csv",
        "errors": [{"message": "", "pattern": "EMPTY", "lines": []}]
    }));
    let group = &record.errors[0];
    assert!(group.lines.is_empty());
    // Empty text is treated like a missing message.
    assert_eq!(group.message, None);
    assert_eq!(group.pattern.as_deref(), Some("EMPTY"));
}

#[test]
fn lines_array_wins_over_legacy_fields() {
    let record = record(json!({
        "id": "x",
        "filename": "both.csv",
        "errors": [{"line": 99, "lines": [{"line": "A1", "values": []}, {"line": 2}]}]
    }));
    let group = &record.errors[0];
    assert_eq!(group.lines.len(), 2);
    assert_eq!(group.lines[0].line, Some(LineRef::Text("A1".to_string())));
}

#[test]
fn malformed_record_is_rejected() {
    let result: Result<ProgressRecord, _> =
        serde_json::from_value(json!({"id": "x", "counts": {"done": -1}}));
    assert!(result.is_err());
}

#[test]
fn dedupe_keeps_first_position_and_last_value() {
    let first = record(json!({"id": "a", "filename": "one.csv", "counts": {"done": 1}}));
    let other = record(json!({"id": "b", "filename": "two.csv"}));
    let newer = record(json!({"id": "a", "filename": "one.csv", "counts": {"done": 9}}));

    let deduped = dedupe_by_id(vec![first, other, newer]);
    assert_eq!(deduped.duplicates, 1);
    assert_eq!(deduped.records.len(), 2);
    assert_eq!(deduped.records[0].id.as_str(), "a");
    assert_eq!(deduped.records[0].counts.done, 9);
    assert_eq!(deduped.records[1].id.as_str(), "b");
}
