mod common;

use common::{customer_import, init_logging, sales_data};
use progress_core::{
    update_detail, DetailKey, DetailMsg, DetailState, Effect, GroupKind, LoadError, LoadErrorKind,
    PatternRow, ProgressRecord,
};

const GEN: u64 = 4;

fn key() -> DetailKey {
    DetailKey::new("krn:clnt:demo-company", "sales-data.csv")
}

fn loaded(state: DetailState, record: ProgressRecord) -> DetailState {
    let generation = state.generation();
    let (state, effects) = update_detail(
        state,
        DetailMsg::Loaded {
            generation,
            record,
            received_at: "10:00:01".to_string(),
        },
    );
    assert!(effects.is_empty());
    state
}

fn failed(state: DetailState, kind: LoadErrorKind) -> (DetailState, Vec<Effect>) {
    let generation = state.generation();
    update_detail(
        state,
        DetailMsg::LoadFailed {
            generation,
            error: LoadError::new(kind, "boom"),
        },
    )
}

fn toggle(state: DetailState, kind: GroupKind, index: usize) -> DetailState {
    update_detail(state, DetailMsg::GroupToggled { kind, index }).0
}

#[test]
fn load_builds_detail_view() {
    init_logging();
    let state = loaded(DetailState::new(GEN, key()), sales_data());
    let view = state.view();

    assert!(!view.loading);
    assert!(!view.not_found);
    let record = view.record.expect("record present");
    assert_eq!(record.row.percent, 88);
    assert_eq!(record.error_groups, 2);
    assert_eq!(record.warning_groups, 1);
    assert_eq!(record.errors.len(), 2);
    assert_eq!(view.last_update.as_deref(), Some("10:00:01"));
}

#[test]
fn expansion_survives_same_identity_refresh() {
    init_logging();
    let state = loaded(DetailState::new(GEN, key()), sales_data());
    let state = toggle(state, GroupKind::Errors, 0);
    assert_eq!(state.view().record.unwrap().errors.len(), 3 + 1 + 1);

    let state = loaded(state, sales_data());
    let (state, effects) = update_detail(
        state,
        DetailMsg::IdentityChanged {
            generation: GEN + 1,
            key: key(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.generation(), GEN);
    assert!(!state.expansion().is_all_collapsed());
    assert_eq!(state.view().record.unwrap().errors.len(), 5);
}

#[test]
fn identity_change_resets_expansion_and_restarts_polling() {
    init_logging();
    let state = loaded(DetailState::new(GEN, key()), sales_data());
    let state = toggle(state, GroupKind::Errors, 0);

    let other = DetailKey::new("krn:clnt:demo-company", "customer-import.csv");
    let (mut state, effects) = update_detail(
        state,
        DetailMsg::IdentityChanged {
            generation: GEN + 1,
            key: other.clone(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::WatchDetail {
            generation: GEN + 1,
            key: other.clone(),
        }]
    );
    assert!(state.consume_dirty());
    assert!(state.expansion().is_all_collapsed());
    assert_eq!(state.record(), None);
    assert!(state.view().loading);

    // Results of the previous identity are dropped.
    let (state, _) = update_detail(
        state,
        DetailMsg::Loaded {
            generation: GEN,
            record: sales_data(),
            received_at: "late".to_string(),
        },
    );
    assert_eq!(state.record(), None);

    let state = loaded(state, customer_import());
    assert_eq!(state.key(), &other);
}

#[test]
fn toggling_single_line_group_is_ignored() {
    init_logging();
    let mut state = loaded(DetailState::new(GEN, key()), sales_data());
    state.consume_dirty();
    // Warning 0 and error 1 each have exactly one occurrence.
    let mut state = toggle(state, GroupKind::Warnings, 0);
    assert!(!state.consume_dirty());
    let mut state = toggle(state, GroupKind::Errors, 1);
    assert!(!state.consume_dirty());
    let mut state = toggle(state, GroupKind::Errors, 7);
    assert!(!state.consume_dirty());
    assert!(state.expansion().is_all_collapsed());
}

#[test]
fn collapse_row_follows_expanded_occurrences() {
    init_logging();
    let state = loaded(DetailState::new(GEN, key()), sales_data());
    let state = toggle(state, GroupKind::Errors, 0);
    let errors = state.view().record.unwrap().errors;
    assert!(matches!(errors[3], PatternRow::Collapse { group: 0 }));
    assert!(matches!(errors[4], PatternRow::Summary(_)));

    let state = toggle(state, GroupKind::Errors, 0);
    assert_eq!(state.view().record.unwrap().errors.len(), 2);
}

#[test]
fn not_found_replaces_record_and_offers_back() {
    init_logging();
    let state = loaded(DetailState::new(GEN, key()), sales_data());
    let (state, effects) = failed(state, LoadErrorKind::NotFound);
    assert_eq!(
        effects,
        vec![Effect::Notify {
            title: "Error".to_string(),
            message: "Progress data not found for this file".to_string(),
        }]
    );

    let view = state.view();
    assert!(view.not_found);
    assert!(view.show_back);
    assert!(view.record.is_none());

    // Still not found on the next tick: no new notification.
    let (state, effects) = failed(state, LoadErrorKind::NotFound);
    assert!(effects.is_empty());

    // The record shows up later.
    let state = loaded(state, sales_data());
    let view = state.view();
    assert!(!view.not_found);
    assert!(view.record.is_some());
}

#[test]
fn not_found_outlives_later_failures_and_dismiss() {
    init_logging();
    let (state, _) = failed(DetailState::new(GEN, key()), LoadErrorKind::NotFound);
    let (state, effects) = failed(state, LoadErrorKind::Transport);
    assert_eq!(effects.len(), 1);

    let view = state.view();
    assert_eq!(view.error.as_deref(), Some("Failed to fetch progress details"));
    assert!(view.not_found);
    assert!(view.show_back);
    assert!(view.record.is_none());

    let (state, _) = update_detail(state, DetailMsg::ErrorDismissed);
    let view = state.view();
    assert_eq!(view.error, None);
    assert!(view.not_found);
    assert!(view.show_back);

    // Only a successful load or another key clears it.
    let (state, _) = update_detail(
        state,
        DetailMsg::IdentityChanged {
            generation: GEN + 1,
            key: DetailKey::new("krn:clnt:demo-company", "customer-import.csv"),
        },
    );
    assert!(!state.is_not_found());
    let (state, _) = failed(state, LoadErrorKind::NotFound);
    let state = loaded(state, customer_import());
    assert!(!state.view().not_found);
}

#[test]
fn failure_reason_reaches_the_view() {
    init_logging();
    let state = loaded(DetailState::new(GEN, key()), sales_data());
    let (state, _) = failed(state, LoadErrorKind::Decode);
    assert_eq!(state.error().map(|banner| banner.reason.as_str()), Some("boom"));
    assert_eq!(state.view().error_reason.as_deref(), Some("boom"));

    let (state, _) = update_detail(state, DetailMsg::ErrorDismissed);
    assert_eq!(state.view().error_reason, None);
}

#[test]
fn transport_failure_keeps_record_without_back() {
    init_logging();
    let state = loaded(DetailState::new(GEN, key()), sales_data());
    let (state, effects) = failed(state, LoadErrorKind::Transport);
    assert_eq!(effects.len(), 1);

    let view = state.view();
    assert_eq!(view.error.as_deref(), Some("Failed to fetch progress details"));
    assert!(!view.show_back);
    assert!(view.record.is_some());
}

#[test]
fn transport_failure_without_data_has_no_back() {
    init_logging();
    let (state, _) = failed(DetailState::new(GEN, key()), LoadErrorKind::Decode);
    let view = state.view();
    assert!(view.record.is_none());
    assert!(!view.not_found);
    assert!(!view.show_back);
    assert!(!view.loading);
}

#[test]
fn buttons_emit_effects() {
    init_logging();
    let state = DetailState::new(GEN, key());
    let (state, effects) = update_detail(state, DetailMsg::RefreshClicked);
    assert_eq!(effects, vec![Effect::RefreshDetail]);
    let (state, effects) = update_detail(state, DetailMsg::BackClicked);
    assert_eq!(effects, vec![Effect::CloseDetail]);
    let (next, effects) = update_detail(state.clone(), DetailMsg::NoOp);
    assert_eq!(next, state);
    assert!(effects.is_empty());
}
