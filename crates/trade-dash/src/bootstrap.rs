use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use dash_core::settings::Settings;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name used under `~/.trade-dash/logs/` when no `--log-file` is given.
pub const DEFAULT_LOG_FILE: &str = "trade-dash.log";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// `~/.trade-dash/`, or `./.trade-dash/` when the home directory is unknown.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".trade-dash")
}

/// Ensure `~/.trade-dash/logs/` exists and return it.
pub fn ensure_log_dir() -> anyhow::Result<PathBuf> {
    let logs = app_dir().join("logs");
    std::fs::create_dir_all(&logs)?;
    Ok(logs)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Pick the log destination for `settings`.
///
/// An explicit `--log-file` always wins. Otherwise interactive views log to
/// `~/.trade-dash/logs/trade-dash.log`, since the TUI owns the terminal, and
/// the `json` view logs to stderr so stdout stays clean.
pub fn log_target(settings: &Settings) -> anyhow::Result<LogTarget> {
    if let Some(path) = &settings.log_file {
        return Ok(LogTarget::File(path.clone()));
    }
    if settings.is_interactive() {
        return Ok(LogTarget::File(ensure_log_dir()?.join(DEFAULT_LOG_FILE)));
    }
    Ok(LogTarget::Stderr)
}

/// Map a `--log-level` value to a `tracing` filter directive.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// `RUST_LOG`, when set, takes precedence over `log_level`.
pub fn setup_logging(log_level: &str, target: &LogTarget) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(log_level)));

    match target {
        LogTarget::Stderr => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        LogTarget::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
