use clap::Parser;
use std::path::PathBuf;

use crate::filters::FilterState;

/// Default endpoint serving the full import record collection.
pub const DEFAULT_API_URL: &str = "http://localhost:5555/api/v1/excel/get_data";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Terminal dashboard for trade-import price and volume trends
#[derive(Parser, Debug, Clone)]
#[command(
    name = "trade-dash",
    about = "Terminal dashboard for trade-import price and volume trends",
    version
)]
pub struct Settings {
    /// Endpoint returning the JSON array of import records
    #[arg(long, env = "TRADE_DASH_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Read records from a local JSON snapshot instead of the API
    #[arg(long, env = "TRADE_DASH_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// View mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "table", "json"])]
    pub view: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "auto"])]
    pub theme: String,

    /// Initial product filter
    #[arg(long)]
    pub product: Option<String>,

    /// Importer to compare (repeatable)
    #[arg(long = "importer", value_name = "IMPORTER")]
    pub importers: Vec<String>,

    /// Initial destination filter
    #[arg(long)]
    pub destination: Option<String>,

    /// Initial year filter
    #[arg(long, value_parser = clap::value_parser!(i32).range(1900..=2100))]
    pub year: Option<i32>,

    /// Logging level
    #[arg(long, env = "TRADE_DASH_LOG", default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path (interactive views log to ~/.trade-dash/logs/ by default)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from(std::env::args_os())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Filter state requested on the command line. Unknown values are
    /// reconciled away once records are loaded.
    pub fn initial_filters(&self) -> FilterState {
        let mut importers: Vec<String> = Vec::new();
        for importer in &self.importers {
            if !importers.contains(importer) {
                importers.push(importer.clone());
            }
        }
        FilterState {
            product: non_empty(self.product.as_deref()),
            importers,
            destination: non_empty(self.destination.as_deref()),
            year: self.year,
        }
    }

    /// `true` for views that take over the terminal.
    pub fn is_interactive(&self) -> bool {
        self.view != "json"
    }
}

/// Treat `""` and the legacy `"all"` sentinel as "no restriction".
fn non_empty(value: Option<&str>) -> Option<String> {
    match value.map(str::trim) {
        None | Some("") => None,
        Some(v) if v.eq_ignore_ascii_case("all") => None,
        Some(v) => Some(v.to_string()),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
