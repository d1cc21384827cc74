mod app;
mod state;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    path::Path,
    sync::Mutex,
};

use curve_core::{
    config::{self, AppConfig},
    engine::{ProspectEngine, SharedEngine},
    settings::{Settings, SettingsStore},
    source::StatsService,
};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = config::ensure_default_config()?;
    let config = AppConfig::load()?;
    init_logging(&config.log_dir)?;
    info!(path = %config_path.display(), source = %config.data_source, "Configuration loaded");

    let settings_store = SettingsStore::new(&config.settings_path);
    let settings = settings_store.load().unwrap_or_else(|err| {
        warn!(?err, "Unreadable settings; using defaults");
        Settings::default()
    });
    let service = StatsService::new(&config.api_base_url, config.request_timeout())?;
    let engine = SharedEngine::new(ProspectEngine::new());

    let mut app = app::CurveApp::new(engine, config, service, settings, settings_store);
    app.run().await
}

/// Log to `<log_dir>/curve.log`; the terminal belongs to the UI.
fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("curve.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
