use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the trade dashboard crates.
#[derive(Error, Debug)]
pub enum DashError {
    /// A record snapshot could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The record payload parsed, but its top level is not a JSON array.
    #[error("Expected a JSON array of import records, got {0}")]
    NotAnArray(String),

    /// The HTTP request for the record collection failed before a response arrived.
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// The data endpoint answered with a non-success status code.
    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashError>;
