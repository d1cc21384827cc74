//! Roster snapshots persisted as JSON.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{config::APP_DIR, models::Player};

/// Point-in-time copy of a prospect roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSnapshot {
    /// When the players were captured.
    pub fetched_at: DateTime<Utc>,
    /// Where the players came from, e.g. `mock` or a service URL.
    #[serde(default)]
    pub source: Option<String>,
    /// Captured players in roster order.
    pub players: Vec<Player>,
}

impl RosterSnapshot {
    /// Capture `players` now.
    pub fn new(players: Vec<Player>, source: Option<String>) -> Self {
        Self {
            fetched_at: Utc::now(),
            source,
            players,
        }
    }

    /// Load a snapshot, returning `None` if the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read roster {}", path.display()))?;
        let snapshot = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse roster {}", path.display()))?;
        Ok(Some(snapshot))
    }

    /// Write the snapshot, creating parent directories if needed.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create roster directory {}", parent.display())
            })?;
        }

        let serialized =
            serde_json::to_string_pretty(self).context("failed to serialize roster snapshot")?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write roster {}", path.display()))
    }
}

/// Default snapshot location under the user's data directory.
pub fn default_roster_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("roster.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::mock;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_none() -> Result<()> {
        let dir = tempdir()?;
        assert!(RosterSnapshot::load(dir.path().join("absent.json"))?.is_none());
        Ok(())
    }

    #[test]
    fn snapshot_survives_disk() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested/roster.json");
        let snapshot = RosterSnapshot::new(mock::top_prospects()?, Some("mock".into()));
        snapshot.persist(&path)?;

        let loaded = RosterSnapshot::load(&path)?.expect("snapshot written");
        assert_eq!(loaded, snapshot);
        Ok(())
    }

    #[test]
    fn invalid_player_fails_with_path() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("roster.json");
        fs::write(
            &path,
            r#"{
                "fetchedAt": "2025-04-01T12:00:00Z",
                "players": [{
                    "id": 1,
                    "fullName": "Nobody",
                    "currentTeam": {
                        "id": 1, "name": "Rays", "abbreviation": "RAY",
                        "teamName": "Rays", "locationName": "Rays",
                        "division": { "id": 201, "name": "AL East" }
                    },
                    "position": { "code": "SS", "name": "Shortstop", "type": "Position Player" },
                    "stats": {},
                    "projectedStats": {
                        "careerProbability": 0.5, "peakWAR": 2.0,
                        "similarPlayers": [], "projectedDebut": "2026"
                    }
                }]
            }"#,
        )?;

        let err = RosterSnapshot::load(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse roster"));
        assert!(format!("{err:#}").contains("no season statistics"));
        Ok(())
    }
}
