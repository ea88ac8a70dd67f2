//! Reusable dashboard widgets.

pub mod filter_panel;
pub mod header;
