//! Background record fetch.
//!
//! The fetch runs on its own tokio task and reports back over a `oneshot`
//! channel, so the TUI event loop can keep drawing the loading screen and
//! poll for the result without blocking.

use dash_core::error::Result;
use dash_data::reader::LoadReport;
use tokio::sync::oneshot;

use crate::source::RecordSource;

/// Outcome of the single fetch.
pub type LoadOutcome = Result<LoadReport>;

// ── RecordLoader ──────────────────────────────────────────────────────────────

pub struct RecordLoader {
    source: RecordSource,
}

impl RecordLoader {
    pub fn new(source: RecordSource) -> Self {
        Self { source }
    }

    /// Spawn the fetch. Returns the receiving end for its outcome and a
    /// [`LoaderHandle`] that can abort it.
    pub fn start(self) -> (oneshot::Receiver<LoadOutcome>, LoaderHandle) {
        let (tx, rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            tracing::debug!(source = %self.source, "loading import records");
            let outcome = self.source.fetch().await;
            if tx.send(outcome).is_err() {
                tracing::debug!("load finished after the receiver was dropped");
            }
        });

        (rx, LoaderHandle { handle })
    }
}

// ── LoaderHandle ──────────────────────────────────────────────────────────────

/// Handle to the background fetch task.
pub struct LoaderHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl LoaderHandle {
    /// Abort the fetch if it is still running.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dash_core::error::DashError;
    use std::io::Write;
    use std::time::Duration;

    #[tokio::test]
    async fn test_loader_delivers_file_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"[{"year": 2024, "month": 5, "product": "A", "importer": "X",
                 "destination": "D", "quantity": 2, "total_value_usd": 8}]"#,
        )
        .unwrap();

        let loader = RecordLoader::new(RecordSource::File {
            path: file.path().to_path_buf(),
        });
        let (rx, _handle) = loader.start();

        let outcome = tokio::time::timeout(Duration::from_secs(5), rx)
            .await
            .expect("timed out waiting for load")
            .expect("loader dropped the sender");
        assert_eq!(outcome.unwrap().records.len(), 1);
    }

    #[tokio::test]
    async fn test_loader_delivers_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let loader = RecordLoader::new(RecordSource::File {
            path: dir.path().join("nope.json"),
        });
        let (rx, _handle) = loader.start();

        let outcome = rx.await.expect("loader dropped the sender");
        assert!(matches!(outcome, Err(DashError::FileRead { .. })));
    }

    #[tokio::test]
    async fn test_loader_abort() {
        // A listener that accepts but never answers keeps the request pending.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let loader = RecordLoader::new(RecordSource::Http {
            url: format!("http://{addr}/"),
        });
        let (rx, handle) = loader.start();

        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.abort();

        // The sender is dropped with the aborted task.
        assert!(rx.await.is_err());
        drop(listener);
    }
}
