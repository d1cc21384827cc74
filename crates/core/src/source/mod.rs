//! Where prospect rosters and projections come from.

pub mod mock;
pub mod roster;
pub mod service;

use std::fmt;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{config::AppConfig, models::Player};

pub use roster::RosterSnapshot;
pub use service::StatsService;

/// Roster origin selected in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Built-in seeded roster.
    #[default]
    Mock,
    /// A [`RosterSnapshot`] file at `roster_path`.
    File,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mock => f.write_str("mock"),
            Self::File => f.write_str("file"),
        }
    }
}

/// Load the configured roster.
pub fn load_players(config: &AppConfig) -> Result<Vec<Player>> {
    let players = match config.data_source {
        DataSource::Mock => mock::top_prospects_seeded(config.mock_seed)?,
        DataSource::File => RosterSnapshot::load(&config.roster_path)?
            .map(|snapshot| snapshot.players)
            .ok_or_else(|| anyhow!("roster file {} not found", config.roster_path.display()))?,
    };
    info!(
        source = %config.data_source,
        players = players.len(),
        "roster loaded"
    );
    Ok(players)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_source_reads_snapshot() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig {
            data_source: DataSource::File,
            roster_path: dir.path().join("roster.json"),
            ..AppConfig::default()
        };
        assert!(load_players(&config).is_err());

        let players = mock::top_prospects()?;
        RosterSnapshot::new(players[..3].to_vec(), None).persist(&config.roster_path)?;
        assert_eq!(load_players(&config)?, players[..3].to_vec());
        Ok(())
    }

    #[test]
    fn mock_source_honours_seed() -> Result<()> {
        let config = AppConfig {
            mock_seed: 11,
            ..AppConfig::default()
        };
        assert_eq!(load_players(&config)?, mock::top_prospects_seeded(11)?);
        Ok(())
    }
}
