//! Full derivation pipeline: records + filter state → everything the
//! dashboard shows.
//!
//! [`DashboardView::compute`] is a pure function of its inputs; callers
//! recompute it whenever the record set or the filter state changes.

use dash_core::filters::FilterState;
use dash_core::models::{AggregatePoint, ImportRecord, Metric, MonthlySummary, SummaryTotals};
use serde::Serialize;
use tracing::debug;

use crate::aggregator::MonthlyAggregator;
use crate::options::FilterOptions;

// ── Public types ──────────────────────────────────────────────────────────────

/// Derived state for one (records, filters) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardView {
    /// The filter state this view was computed for.
    pub filters: FilterState,
    /// Records passing every active filter, in input order.
    #[serde(skip)]
    pub filtered: Vec<ImportRecord>,
    /// Number of records passing every active filter.
    pub filtered_count: usize,
    /// Selector options, each excluding its own field's filter.
    pub options: FilterOptions,
    /// Average price per unit, by month.
    pub price_series: Vec<AggregatePoint>,
    /// Summed quantity, by month.
    pub volume_series: Vec<AggregatePoint>,
    /// Month-by-month roll-up of the filtered records.
    pub summary: Vec<MonthlySummary>,
    pub totals: SummaryTotals,
}

impl DashboardView {
    /// Derive options, both chart series and the monthly summary.
    ///
    /// `filters` is used as given; run it through
    /// [`reconcile`](crate::options::reconcile) first if it may reference
    /// values that no longer exist.
    pub fn compute(records: &[ImportRecord], filters: &FilterState) -> Self {
        let filtered = filter_records(records, filters);
        let (summary, totals) = MonthlyAggregator::monthly_summary(&filtered);

        let view = Self {
            filters: filters.clone(),
            filtered_count: filtered.len(),
            filtered,
            options: FilterOptions::compute(records, filters),
            price_series: MonthlyAggregator::aggregate_by_month(records, filters, Metric::Price),
            volume_series: MonthlyAggregator::aggregate_by_month(records, filters, Metric::Volume),
            summary,
            totals,
        };

        debug!(
            filters = %filters,
            records = records.len(),
            filtered = view.filtered_count,
            months = view.price_series.len(),
            "computed dashboard view"
        );

        view
    }

    /// The series for `metric`.
    pub fn series(&self, metric: Metric) -> &[AggregatePoint] {
        match metric {
            Metric::Price => &self.price_series,
            Metric::Volume => &self.volume_series,
        }
    }

    /// `true` when no record passes the active filters.
    pub fn is_empty(&self) -> bool {
        self.filtered_count == 0
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Records passing every active filter, in input order.
pub fn filter_records(records: &[ImportRecord], filters: &FilterState) -> Vec<ImportRecord> {
    records
        .iter()
        .filter(|r| filters.matches(r))
        .cloned()
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
