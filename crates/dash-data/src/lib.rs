//! Data layer for the trade-import dashboard.
//!
//! Decodes the record collection, derives selector options, reconciles
//! filter state and aggregates records into month-keyed chart series.

pub mod aggregator;
pub mod analysis;
pub mod options;
pub mod reader;

pub use aggregator::MonthlyAggregator;
pub use analysis::{filter_records, DashboardView};
pub use dash_core as core;
pub use options::{reconcile, reconcile_after, FilterOptions};
pub use reader::{parse_records, LoadReport};
