//! Decoding of the record collection served by the data API.
//!
//! The payload is a JSON array of row objects. Rows that cannot be decoded
//! into an [`ImportRecord`], or that carry a month outside 1–12, are skipped
//! with a warning instead of failing the whole load.

use dash_core::error::{DashError, Result};
use dash_core::models::ImportRecord;
use serde_json::Value;
use tracing::{debug, warn};

/// Records decoded from one payload, plus the number of rows dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub records: Vec<ImportRecord>,
    pub skipped: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decode a raw response body.
pub fn parse_records(body: &[u8]) -> Result<LoadReport> {
    let value: Value = serde_json::from_slice(body)?;
    records_from_value(value)
}

/// Decode an already-parsed JSON document.
pub fn records_from_value(value: Value) -> Result<LoadReport> {
    let rows = match value {
        Value::Array(rows) => rows,
        other => return Err(DashError::NotAnArray(json_kind(&other).to_string())),
    };

    let mut report = LoadReport {
        records: Vec::with_capacity(rows.len()),
        skipped: 0,
    };

    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<ImportRecord>(row) {
            Ok(record) if (1..=12).contains(&record.month) => report.records.push(record),
            Ok(record) => {
                warn!(index, month = record.month, "skipping row with invalid month");
                report.skipped += 1;
            }
            Err(e) => {
                warn!(index, error = %e, "skipping malformed row");
                report.skipped += 1;
            }
        }
    }

    debug!(
        records = report.records.len(),
        skipped = report.skipped,
        "decoded import records"
    );

    Ok(report)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
