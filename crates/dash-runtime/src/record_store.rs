//! In-memory holder for the loaded record collection.
//!
//! The collection is fetched once per session and never refreshed, so the
//! store only tracks a single transition out of [`LoadState::Loading`].

use chrono::{DateTime, Utc};
use dash_core::error::DashError;
use dash_core::models::ImportRecord;
use dash_data::reader::LoadReport;

/// Message shown to the user when the load fails. The specific cause goes to
/// the log only.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to fetch data";

// ── LoadState ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// Fetch in flight; nothing to show yet.
    Loading,
    /// Records are available.
    Ready {
        loaded_at: DateTime<Utc>,
        /// Rows dropped because they could not be decoded.
        skipped: usize,
    },
    /// The fetch failed. No retry is attempted.
    Failed { message: String },
}

// ── RecordStore ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<ImportRecord>,
    state: LoadState,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            state: LoadState::Loading,
        }
    }

    /// Install a successfully decoded collection.
    pub fn set(&mut self, report: LoadReport) {
        tracing::info!(
            records = report.records.len(),
            skipped = report.skipped,
            "import records loaded"
        );
        self.state = LoadState::Ready {
            loaded_at: Utc::now(),
            skipped: report.skipped,
        };
        self.records = report.records;
    }

    /// Record a failed load. The store is left empty.
    pub fn fail(&mut self, error: &DashError) {
        tracing::error!(error = %error, "failed to load import records");
        self.records.clear();
        self.state = LoadState::Failed {
            message: LOAD_FAILED_MESSAGE.to_string(),
        };
    }

    pub fn records(&self) -> &[ImportRecord] {
        &self.records
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, LoadState::Ready { .. })
    }

    /// The user-facing failure message, if the load failed.
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed { message } => Some(message),
            _ => None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
