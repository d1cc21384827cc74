#![warn(clippy::all, missing_docs)]

//! Core domain logic for Career Curve, a baseball prospect tracker.
//!
//! This crate hosts the player and team models, the prospect query
//! engine and its analytics, roster sources, configuration and user
//! settings used by the terminal UI and any future frontends.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod models;
pub mod settings;
pub mod source;

pub use config::AppConfig;
pub use engine::{ProspectEngine, RefreshReport, SharedEngine, SortKey, Summary};
pub use models::{Division, Player, PositionType, ProjectedStats, Team};
pub use settings::{SettingKey, Settings, SettingsStore};
pub use source::{DataSource, RosterSnapshot, StatsService};
