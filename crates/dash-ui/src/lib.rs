//! Terminal UI layer for the trade-import dashboard.
//!
//! Provides themes, the header and filter panel components, the price and
//! quantity charts, the monthly summary table, and the main application
//! event loop built on top of [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod components;
pub mod table_view;
pub mod themes;

pub use dash_core as core;
