#![allow(dead_code)]

use std::sync::Once;

use progress_core::ProgressRecord;
use serde_json::{json, Value};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(progress_logging::initialize_for_tests);
}

pub fn record(value: Value) -> ProgressRecord {
    serde_json::from_value(value).expect("valid progress record")
}

pub fn sales_data() -> ProgressRecord {
    record(json!({
        "id": "rec-1",
        "clientKey": "krn:clnt:demo-company",
        "filename": "sales-data.csv",
        "email": "john.doe@example.com",
        "counts": {"done": 850, "warn": 25, "failed": 5},
        "total": 1000,
        "isCompleted": false,
        "createdAt": "2024-01-15T10:00:00Z",
        "updatedAt": "2024-01-15T10:30:00Z",
        "errors": [
            {
                "message": "Invalid date format",
                "pattern": "DATE_FORMAT",
                "lines": [
                    {"line": 15, "values": ["2024-13-01"]},
                    {"line": 42, "values": ["2024-02-30"]},
                    {"line": 87, "values": ["01/15/24"]}
                ]
            },
            {"message": "Missing customer id", "pattern": "REQUIRED", "line": 9, "values": ["customer_id"]}
        ],
        "warnings": [
            {"message": "Trailing whitespace", "pattern": "WS", "lines": [{"line": 3, "values": ["name"]}]}
        ]
    }))
}

pub fn customer_import() -> ProgressRecord {
    record(json!({
        "id": "rec-2",
        "clientKey": "krn:clnt:demo-company",
        "filename": "customer-import.csv",
        "email": "jane.smith@example.com",
        "counts": {"done": 500, "warn": 0, "failed": 0},
        "total": 500,
        "isCompleted": true,
        "createdAt": "2024-01-15T09:00:00Z",
        "updatedAt": "2024-01-15T09:45:00Z",
        "errors": [],
        "warnings": []
    }))
}

/// `count` in-progress records named `file-00.csv`, `file-01.csv`, ...
pub fn numbered(count: usize) -> Vec<ProgressRecord> {
    (0..count)
        .map(|i| {
            record(json!({
                "id": format!("n-{i}"),
                "clientKey": "krn:clnt:demo-company",
                "filename": format!("file-{i:02}.csv"),
                "email": "bulk@example.com",
                "counts": {"done": i, "warn": 0, "failed": 0},
                "total": 100,
                "isCompleted": false
            }))
        })
        .collect()
}
