//! Runtime layer for the trade-import dashboard.
//!
//! Fetches the record collection once in the background and owns the
//! session state that ties records, filters and the derived view together.

pub mod loader;
pub mod record_store;
pub mod session;
pub mod source;

pub use dash_core as core;
pub use dash_data as data;
pub use loader::{LoadOutcome, LoaderHandle, RecordLoader};
pub use record_store::{LoadState, RecordStore, LOAD_FAILED_MESSAGE};
pub use session::DashboardSession;
pub use source::RecordSource;
