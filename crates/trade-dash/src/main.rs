mod bootstrap;

use anyhow::{Context, Result};
use dash_core::filters::FilterState;
use dash_core::settings::Settings;
use dash_runtime::loader::RecordLoader;
use dash_runtime::session::DashboardSession;
use dash_runtime::source::RecordSource;
use dash_ui::app::{App, ViewMode};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    let target = bootstrap::log_target(&settings)?;
    bootstrap::setup_logging(&settings.log_level, &target)?;

    let source = RecordSource::from_settings(&settings);
    let filters = settings.initial_filters();

    tracing::info!("Trade Dash v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Source: {}, View: {}, Theme: {}, Filters: {}",
        source,
        settings.view,
        settings.theme,
        filters
    );

    if settings.is_interactive() {
        run_tui(&settings, source, filters).await
    } else {
        run_json(source, filters).await
    }
}

/// Load once, reconcile the requested filters and print the derived view.
async fn run_json(source: RecordSource, filters: FilterState) -> Result<()> {
    let report = source
        .fetch()
        .await
        .with_context(|| format!("loading import records from {source}"))?;

    let mut session = DashboardSession::new(filters);
    session.set_records(report);

    println!("{}", serde_json::to_string_pretty(session.view())?);
    Ok(())
}

async fn run_tui(settings: &Settings, source: RecordSource, filters: FilterState) -> Result<()> {
    let app = App::new(
        &settings.theme,
        ViewMode::from_name(&settings.view),
        source.to_string(),
        filters,
    );

    let (rx, handle) = RecordLoader::new(source).start();

    // The loop exits on 'q' / Ctrl+C inside the TUI. The OS-level Ctrl+C
    // listener covers signals that arrive outside raw mode.
    tokio::select! {
        result = app.run(rx) => {
            handle.abort();
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down");
            handle.abort();
        }
    }

    Ok(())
}
