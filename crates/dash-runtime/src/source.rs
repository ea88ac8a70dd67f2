//! Where the record collection comes from.
//!
//! The dashboard normally issues one GET against the data API; a local JSON
//! snapshot with the same shape can stand in for it.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use dash_core::error::{DashError, Result};
use dash_core::settings::Settings;
use dash_data::reader::{parse_records, LoadReport};

/// Upper bound on the whole HTTP exchange.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ── RecordSource ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    /// `GET url`, expecting a JSON array body.
    Http { url: String },
    /// A JSON snapshot on disk.
    File { path: PathBuf },
}

impl RecordSource {
    /// `--data-file` wins over `--api-url` when both are given.
    pub fn from_settings(settings: &Settings) -> Self {
        match &settings.data_file {
            Some(path) => RecordSource::File { path: path.clone() },
            None => RecordSource::Http {
                url: settings.api_url.clone(),
            },
        }
    }

    /// Fetch and decode the full record collection once.
    pub async fn fetch(&self) -> Result<LoadReport> {
        match self {
            RecordSource::Http { url } => fetch_http(url).await,
            RecordSource::File { path } => {
                let body = tokio::fs::read(path)
                    .await
                    .map_err(|source| DashError::FileRead {
                        path: path.clone(),
                        source,
                    })?;
                parse_records(&body)
            }
        }
    }
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordSource::Http { url } => f.write_str(url),
            RecordSource::File { path } => write!(f, "file:{}", path.display()),
        }
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

async fn fetch_http(url: &str) -> Result<LoadReport> {
    let fetch_err = |e: reqwest::Error| DashError::Fetch {
        url: url.to_string(),
        message: e.to_string(),
    };

    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(fetch_err)?;

    tracing::debug!(%url, "requesting import records");
    let response = client.get(url).send().await.map_err(fetch_err)?;

    let status = response.status();
    if !status.is_success() {
        return Err(DashError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(fetch_err)?;
    parse_records(&body)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
