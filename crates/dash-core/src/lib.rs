//! Shared domain types for the trade-import dashboard.
//!
//! Import records, month keys, filter state and the filtering predicate,
//! chart-ready aggregate points, plus the ambient pieces every other crate
//! uses: the error type, CLI settings and number formatting.

pub mod error;
pub mod filters;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{DashError, Result};
pub use filters::{FilterChange, FilterField, FilterState};
pub use models::{AggregatePoint, ImportRecord, Metric, MonthKey, SeriesValues};
