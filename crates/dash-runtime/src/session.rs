//! Dashboard session: the record store, the filter state and the derived
//! view, kept consistent with each other.
//!
//! Every filter mutation goes through [`DashboardSession::apply`], which
//! reconciles the new state against the records and recomputes the view in
//! full before returning.

use dash_core::error::DashError;
use dash_core::filters::{FilterChange, FilterField, FilterState};
use dash_data::analysis::DashboardView;
use dash_data::options::{reconcile, reconcile_after};
use dash_data::reader::LoadReport;
use tracing::debug;

use crate::loader::LoadOutcome;
use crate::record_store::{LoadState, RecordStore};

pub struct DashboardSession {
    store: RecordStore,
    filters: FilterState,
    view: DashboardView,
}

impl DashboardSession {
    /// Start a session in the loading state. `initial` is kept as requested
    /// and reconciled once records arrive.
    pub fn new(initial: FilterState) -> Self {
        Self {
            store: RecordStore::new(),
            view: DashboardView {
                filters: initial.clone(),
                ..Default::default()
            },
            filters: initial,
        }
    }

    // ── Load transitions ──────────────────────────────────────────────────────

    /// Install loaded records, reconcile the current filters against them and
    /// recompute the view.
    pub fn set_records(&mut self, report: LoadReport) {
        self.store.set(report);
        let (filters, changed) = reconcile(self.store.records(), &self.filters);
        if changed {
            debug!(from = %self.filters, to = %filters, "initial filters reconciled");
        }
        self.filters = filters;
        self.recompute();
    }

    /// Record a failed load. The view is cleared.
    pub fn mark_failed(&mut self, error: &DashError) {
        self.store.fail(error);
        self.recompute();
    }

    /// Route a loader outcome to [`set_records`](Self::set_records) or
    /// [`mark_failed`](Self::mark_failed).
    pub fn finish_load(&mut self, outcome: LoadOutcome) {
        match outcome {
            Ok(report) => self.set_records(report),
            Err(e) => self.mark_failed(&e),
        }
    }

    // ── Filter mutation ───────────────────────────────────────────────────────

    /// Apply one user filter change. Returns `true` when the effective filter
    /// state changed.
    pub fn apply(&mut self, change: FilterChange) -> bool {
        let last_changed = changed_field(&change);
        let mut next = self.filters.clone();
        if !next.apply(change) {
            return false;
        }

        let (next, reconciled) = match last_changed {
            Some(field) => reconcile_after(self.store.records(), &next, field),
            None => reconcile(self.store.records(), &next),
        };
        if reconciled {
            debug!(filters = %next, "filters reconciled after change");
        }

        if next == self.filters {
            return false;
        }
        self.filters = next;
        self.recompute();
        true
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn load_state(&self) -> &LoadState {
        self.store.state()
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn recompute(&mut self) {
        self.view = DashboardView::compute(self.store.records(), &self.filters);
    }
}

/// The field a change targets, or `None` for a change touching every field.
fn changed_field(change: &FilterChange) -> Option<FilterField> {
    match change {
        FilterChange::Product(_) => Some(FilterField::Product),
        FilterChange::Importers(_) | FilterChange::ToggleImporter(_) => {
            Some(FilterField::Importers)
        }
        FilterChange::Destination(_) => Some(FilterField::Destination),
        FilterChange::Year(_) => Some(FilterField::Year),
        FilterChange::Reset(field) => Some(*field),
        FilterChange::ClearAll => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
