#![allow(missing_docs)]

//! User preferences and their persistence.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config;

/// Smallest text scale.
pub const FONT_SCALE_MIN: f64 = 0.8;
/// Largest text scale.
pub const FONT_SCALE_MAX: f64 = 1.4;
/// Granularity of the text scale.
pub const FONT_SCALE_STEP: f64 = 0.1;

/// Rejected setting updates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// Key name not recognised.
    #[error("unknown setting '{0}'")]
    UnknownKey(String),
    /// Value does not parse for the key's type.
    #[error("invalid value '{value}' for {key}")]
    InvalidValue {
        /// Target setting.
        key: SettingKey,
        /// Offending input.
        value: String,
    },
}

/// Every user-adjustable preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// Dark colour palette.
    DarkMode,
    /// Text scale between [`FONT_SCALE_MIN`] and [`FONT_SCALE_MAX`].
    FontScale,
    /// Display name.
    UserName,
    /// Contact address.
    UserEmail,
}

impl SettingKey {
    /// Display order.
    pub const ALL: [SettingKey; 4] = [
        SettingKey::DarkMode,
        SettingKey::FontScale,
        SettingKey::UserName,
        SettingKey::UserEmail,
    ];

    /// Stable key used in files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DarkMode => "dark_mode",
            Self::FontScale => "font_scale",
            Self::UserName => "user_name",
            Self::UserEmail => "user_email",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::DarkMode => "Dark Mode",
            Self::FontScale => "Text Size",
            Self::UserName => "Name",
            Self::UserEmail => "Email",
        }
    }

    /// Whether the value is free text rather than a toggle or stepper.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::UserName | Self::UserEmail)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownKey(s.to_string()))
    }
}

/// Current preference values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dark_mode: bool,
    pub font_scale: f64,
    pub user_name: String,
    pub user_email: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            font_scale: 1.0,
            user_name: "User".to_string(),
            user_email: "user@example.com".to_string(),
        }
    }
}

impl Settings {
    /// Raw value of `key`, in the form [`Settings::set`] accepts.
    pub fn get(&self, key: SettingKey) -> String {
        match key {
            SettingKey::DarkMode => self.dark_mode.to_string(),
            SettingKey::FontScale => format!("{:.1}", self.font_scale),
            SettingKey::UserName => self.user_name.clone(),
            SettingKey::UserEmail => self.user_email.clone(),
        }
    }

    /// Value of `key` formatted for display.
    pub fn display_value(&self, key: SettingKey) -> String {
        match key {
            SettingKey::DarkMode if self.dark_mode => "On".to_string(),
            SettingKey::DarkMode => "Off".to_string(),
            SettingKey::FontScale => format!("{:.0}%", self.font_scale * 100.0),
            _ => self.get(key),
        }
    }

    /// Parse `raw` for `key` and store it. Text scale is clamped and snapped.
    pub fn set(&mut self, key: SettingKey, raw: &str) -> Result<(), SettingsError> {
        let invalid = || SettingsError::InvalidValue {
            key,
            value: raw.to_string(),
        };
        let value = raw.trim();
        match key {
            SettingKey::DarkMode => {
                self.dark_mode = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => return Err(invalid()),
                };
            }
            SettingKey::FontScale => {
                let scale: f64 = value.parse().map_err(|_| invalid())?;
                if !scale.is_finite() {
                    return Err(invalid());
                }
                self.font_scale = snap_font_scale(scale);
            }
            SettingKey::UserName | SettingKey::UserEmail => {
                if value.is_empty() {
                    return Err(invalid());
                }
                let slot = if key == SettingKey::UserName {
                    &mut self.user_name
                } else {
                    &mut self.user_email
                };
                *slot = value.to_string();
            }
        }
        debug!(%key, value = %self.get(key), "setting updated");
        Ok(())
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    /// Move the text scale by `steps` increments, staying in range.
    pub fn step_font_scale(&mut self, steps: i32) {
        self.font_scale = snap_font_scale(self.font_scale + f64::from(steps) * FONT_SCALE_STEP);
    }

    fn normalize(&mut self) {
        self.font_scale = if self.font_scale.is_finite() {
            snap_font_scale(self.font_scale)
        } else {
            Settings::default().font_scale
        };
    }
}

fn snap_font_scale(scale: f64) -> f64 {
    let clamped = scale.clamp(FONT_SCALE_MIN, FONT_SCALE_MAX);
    (clamped / FONT_SCALE_STEP).round() * FONT_SCALE_STEP
}

/// Reads and writes [`Settings`] as JSON.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user's config directory.
    pub fn default_path() -> PathBuf {
        config::config_dir().join("settings.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored settings, or defaults if nothing has been saved yet.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let mut settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        settings.normalize();
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let serialised = serde_json::to_vec_pretty(settings)?;
        fs::write(&self.path, serialised)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}
