//! Application configuration.
//!
//! Values come from `config.toml` under the user's config directory, with
//! `CURVE_*` environment variables layered on top (`CURVE_DATA_SOURCE=file`,
//! `CURVE_MOCK_SEED=7`, ...). Missing keys take their defaults.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use ::config::{Config, Environment, File, FileFormat};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    settings::SettingsStore,
    source::{mock, roster, service, DataSource},
};

/// Directory name used under the platform config and data directories.
pub const APP_DIR: &str = "career-curve";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "CURVE";

const CONFIG_FILE: &str = "config.toml";

const DEFAULT_CONFIG: &str = r#"# Career Curve configuration.
# Every key is optional; environment variables named CURVE_<KEY> override it.

# Where the roster comes from: "mock" or "file".
data_source = "mock"

# Seed for the built-in mock roster.
mock_seed = 2024

# Roster snapshot read when data_source = "file".
# roster_path = "/path/to/roster.json"

# Stats service used for projections.
api_base_url = "https://statsapi.mlb.com/api/v1"
request_timeout_secs = 10

# Directory for log files, relative to the working directory unless absolute.
log_dir = "logs"
"#;

/// Typed application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Roster origin.
    pub data_source: DataSource,
    /// Seed for [`DataSource::Mock`].
    pub mock_seed: u64,
    /// Snapshot read for [`DataSource::File`].
    pub roster_path: PathBuf,
    /// Stats service root.
    pub api_base_url: String,
    /// Per-request timeout for the stats service.
    pub request_timeout_secs: u64,
    /// Where user settings are stored.
    pub settings_path: PathBuf,
    /// Directory for `curve.log`.
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_source: DataSource::Mock,
            mock_seed: mock::DEFAULT_SEED,
            roster_path: roster::default_roster_path(),
            api_base_url: service::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            settings_path: SettingsStore::default_path(),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl AppConfig {
    /// Load from the default config file plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from `path` plus environment overrides. A missing file is fine.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Platform config directory for the application.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Default location of `config.toml`.
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Write the commented default config on first run.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    ensure_config_at(&path)?;
    Ok(path)
}

/// Write the default config to `path` unless it exists. Returns whether a
/// file was written.
pub fn ensure_config_at(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote default configuration");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_file_matches_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("career-curve/config.toml");
        assert!(ensure_config_at(&path)?);
        assert!(!ensure_config_at(&path)?);

        let loaded = AppConfig::load_from(&path)?;
        assert_eq!(loaded, AppConfig::default());
        Ok(())
    }

    #[test]
    fn missing_file_uses_defaults() -> Result<()> {
        let dir = tempdir()?;
        let loaded = AppConfig::load_from(dir.path().join("nope.toml"))?;
        assert_eq!(loaded.data_source, DataSource::Mock);
        assert_eq!(loaded.request_timeout(), Duration::from_secs(10));
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "data_source = \"file\"\nroster_path = \"/tmp/roster.json\"\nmock_seed = 3\n",
        )?;

        let loaded = AppConfig::load_from(&path)?;
        assert_eq!(loaded.data_source, DataSource::File);
        assert_eq!(loaded.roster_path, PathBuf::from("/tmp/roster.json"));
        assert_eq!(loaded.mock_seed, 3);
        assert_eq!(loaded.api_base_url, service::DEFAULT_BASE_URL);
        Ok(())
    }

    #[test]
    fn unknown_source_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "data_source = \"carrier-pigeon\"\n")?;
        assert!(AppConfig::load_from(&path).is_err());
        Ok(())
    }
}
