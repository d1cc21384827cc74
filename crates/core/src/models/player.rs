#![allow(missing_docs)]

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Team;

/// Maximum number of comparable players attached to a projection.
pub const MAX_SIMILAR_PLAYERS: usize = 2;

static DEBUT_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}$").expect("failed to compile debut year regex"));

/// Validation failures raised while building player records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Season statistics do not match the position classification.
    #[error("{player}: {position_type} requires {expected} statistics")]
    StatsMismatch {
        /// Player full name.
        player: String,
        /// Declared position type.
        position_type: PositionType,
        /// Kind of statistics the position type calls for.
        expected: &'static str,
    },
    /// Neither batting nor pitching statistics were supplied.
    #[error("{0}: no season statistics present")]
    MissingStats(String),
    /// Both batting and pitching statistics were supplied.
    #[error("{0}: both batting and pitching statistics present")]
    ConflictingStats(String),
    /// Career probability outside `[0, 1]`.
    #[error("career probability {0} outside [0, 1]")]
    ProbabilityOutOfRange(f64),
    /// Peak WAR is NaN or infinite.
    #[error("peak WAR {0} is not finite")]
    NonFiniteWar(f64),
    /// More comparable players than a projection carries.
    #[error("{0} similar players listed (at most 2)")]
    TooManySimilarPlayers(usize),
    /// Debut is not a four digit year.
    #[error("projected debut '{0}' is not a four digit year")]
    InvalidDebut(String),
}

/// Broad classification of a roster position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum PositionType {
    /// Starting or relief pitcher.
    #[serde(rename = "Pitcher")]
    Pitcher,
    /// Any fielding position or designated hitter.
    #[serde(rename = "Position Player")]
    PositionPlayer,
}

impl PositionType {
    /// Classify a position code; any code containing `P` is a pitcher.
    pub fn from_code(code: &str) -> Self {
        if code.contains('P') {
            Self::Pitcher
        } else {
            Self::PositionPlayer
        }
    }

    /// Display label, matching the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pitcher => "Pitcher",
            Self::PositionPlayer => "Position Player",
        }
    }
}

impl fmt::Display for PositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Roster position descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Short code such as `SS` or `RHP`.
    pub code: String,
    /// Display name such as `Shortstop`.
    pub name: String,
    /// Pitcher or position player.
    #[serde(rename = "type")]
    pub kind: PositionType,
}

/// Current-season hitting line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattingStats {
    pub avg: f64,
    pub hr: u32,
    pub rbi: u32,
    pub obp: f64,
    pub slg: f64,
    pub ops: f64,
    pub games: u32,
    pub at_bats: u32,
    pub hits: u32,
}

/// Current-season pitching line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchingStats {
    pub era: f64,
    pub wins: u32,
    pub losses: u32,
    pub saves: u32,
    pub strikeouts: u32,
    pub innings: f64,
    pub whip: f64,
    pub games: u32,
    pub games_started: u32,
}

/// Season statistics; exactly one kind is ever present.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerStats {
    Batting(BattingStats),
    Pitching(PitchingStats),
}

impl PlayerStats {
    pub fn batting(&self) -> Option<&BattingStats> {
        match self {
            Self::Batting(stats) => Some(stats),
            Self::Pitching(_) => None,
        }
    }

    pub fn pitching(&self) -> Option<&PitchingStats> {
        match self {
            Self::Pitching(stats) => Some(stats),
            Self::Batting(_) => None,
        }
    }

    /// Position type these statistics belong to.
    pub fn position_type(&self) -> PositionType {
        match self {
            Self::Batting(_) => PositionType::PositionPlayer,
            Self::Pitching(_) => PositionType::Pitcher,
        }
    }
}

/// Forward-looking projection attached to a prospect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedStats {
    /// Likelihood of reaching and sticking in the majors, in `[0, 1]`.
    pub career_probability: f64,
    /// Projected peak-season WAR.
    #[serde(rename = "peakWAR")]
    pub peak_war: f64,
    /// Up to two established comparables.
    #[serde(default)]
    pub similar_players: Vec<String>,
    /// Four digit debut year.
    pub projected_debut: String,
}

impl ProjectedStats {
    pub fn new(
        career_probability: f64,
        peak_war: f64,
        similar_players: Vec<String>,
        projected_debut: impl Into<String>,
    ) -> Self {
        Self {
            career_probability,
            peak_war,
            similar_players,
            projected_debut: projected_debut.into(),
        }
    }

    /// Check the value domains of every field.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(0.0..=1.0).contains(&self.career_probability) {
            return Err(ModelError::ProbabilityOutOfRange(self.career_probability));
        }
        if !self.peak_war.is_finite() {
            return Err(ModelError::NonFiniteWar(self.peak_war));
        }
        if self.similar_players.len() > MAX_SIMILAR_PLAYERS {
            return Err(ModelError::TooManySimilarPlayers(
                self.similar_players.len(),
            ));
        }
        if !DEBUT_YEAR_RE.is_match(&self.projected_debut) {
            return Err(ModelError::InvalidDebut(self.projected_debut.clone()));
        }
        Ok(())
    }

    /// Debut year as a number, if it parses.
    pub fn debut_year(&self) -> Option<i32> {
        self.projected_debut.parse().ok()
    }
}

/// Immutable prospect record.
///
/// Projections are never edited in place; [`Player::with_projection`] yields
/// a new record carrying the replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PlayerRecord", into = "PlayerRecord")]
pub struct Player {
    id: u64,
    full_name: String,
    current_team: Team,
    position: Position,
    stats: PlayerStats,
    projected_stats: ProjectedStats,
}

impl Player {
    /// Build a player, rejecting statistics that disagree with the position
    /// type and out-of-domain projections.
    pub fn new(
        id: u64,
        full_name: impl Into<String>,
        current_team: Team,
        position: Position,
        stats: PlayerStats,
        projected_stats: ProjectedStats,
    ) -> Result<Self, ModelError> {
        let full_name = full_name.into();
        if stats.position_type() != position.kind {
            let expected = match position.kind {
                PositionType::Pitcher => "pitching",
                PositionType::PositionPlayer => "batting",
            };
            return Err(ModelError::StatsMismatch {
                player: full_name,
                position_type: position.kind,
                expected,
            });
        }
        projected_stats.validate()?;
        Ok(Self {
            id,
            full_name,
            current_team,
            position,
            stats,
            projected_stats,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn current_team(&self) -> &Team {
        &self.current_team
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn projected_stats(&self) -> &ProjectedStats {
        &self.projected_stats
    }

    /// Copy of this player with its projection replaced.
    pub fn with_projection(&self, projected_stats: ProjectedStats) -> Self {
        Self {
            projected_stats,
            ..self.clone()
        }
    }
}

/// Serialized shape of a player, with optional batting/pitching slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerRecord {
    id: u64,
    full_name: String,
    current_team: Team,
    position: Position,
    stats: StatsRecord,
    projected_stats: ProjectedStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StatsRecord {
    #[serde(default)]
    batting: Option<BattingStats>,
    #[serde(default)]
    pitching: Option<PitchingStats>,
}

impl TryFrom<PlayerRecord> for Player {
    type Error = ModelError;

    fn try_from(record: PlayerRecord) -> Result<Self, Self::Error> {
        let stats = match (record.stats.batting, record.stats.pitching) {
            (Some(batting), None) => PlayerStats::Batting(batting),
            (None, Some(pitching)) => PlayerStats::Pitching(pitching),
            (None, None) => return Err(ModelError::MissingStats(record.full_name)),
            (Some(_), Some(_)) => return Err(ModelError::ConflictingStats(record.full_name)),
        };
        Player::new(
            record.id,
            record.full_name,
            record.current_team,
            record.position,
            stats,
            record.projected_stats,
        )
    }
}

impl From<Player> for PlayerRecord {
    fn from(player: Player) -> Self {
        let stats = match player.stats {
            PlayerStats::Batting(batting) => StatsRecord {
                batting: Some(batting),
                pitching: None,
            },
            PlayerStats::Pitching(pitching) => StatsRecord {
                batting: None,
                pitching: Some(pitching),
            },
        };
        Self {
            id: player.id,
            full_name: player.full_name,
            current_team: player.current_team,
            position: player.position,
            stats,
            projected_stats: player.projected_stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::Division;

    fn team() -> Team {
        Team {
            id: 110,
            name: "Orioles".to_string(),
            abbreviation: "ORI".to_string(),
            team_name: "Orioles".to_string(),
            location_name: "Orioles".to_string(),
            division: Division::new(201, "AL East"),
        }
    }

    fn batting() -> BattingStats {
        BattingStats {
            avg: 0.288,
            hr: 18,
            rbi: 71,
            obp: 0.371,
            slg: 0.482,
            ops: 0.853,
            games: 121,
            at_bats: 455,
            hits: 131,
        }
    }

    fn projection() -> ProjectedStats {
        ProjectedStats::new(0.95, 6.5, vec!["Juan Soto".to_string()], "2024")
    }

    fn shortstop() -> Position {
        Position {
            code: "SS".to_string(),
            name: "Shortstop".to_string(),
            kind: PositionType::PositionPlayer,
        }
    }

    #[test]
    fn rejects_stats_that_disagree_with_position() {
        let position = Position {
            code: "RHP".to_string(),
            name: "Right-Handed Pitcher".to_string(),
            kind: PositionType::Pitcher,
        };
        let err = Player::new(
            1,
            "Jackson Holliday",
            team(),
            position,
            PlayerStats::Batting(batting()),
            projection(),
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::StatsMismatch { .. }));
    }

    #[test]
    fn classifies_codes_containing_p_as_pitchers() {
        assert_eq!(PositionType::from_code("LHP"), PositionType::Pitcher);
        assert_eq!(PositionType::from_code("RHP"), PositionType::Pitcher);
        assert_eq!(PositionType::from_code("SS"), PositionType::PositionPlayer);
        assert_eq!(PositionType::from_code("UTL"), PositionType::PositionPlayer);
    }

    #[test]
    fn projection_validation() {
        assert!(projection().validate().is_ok());

        let mut bad = projection();
        bad.career_probability = 1.2;
        assert_eq!(bad.validate(), Err(ModelError::ProbabilityOutOfRange(1.2)));

        let mut bad = projection();
        bad.projected_debut = "24".to_string();
        assert!(matches!(bad.validate(), Err(ModelError::InvalidDebut(_))));

        let mut bad = projection();
        bad.similar_players = vec!["A".into(), "B".into(), "C".into()];
        assert_eq!(bad.validate(), Err(ModelError::TooManySimilarPlayers(3)));

        let mut bad = projection();
        bad.peak_war = f64::NAN;
        assert!(matches!(bad.validate(), Err(ModelError::NonFiniteWar(_))));
    }

    #[test]
    fn with_projection_leaves_original_untouched() {
        let player = Player::new(
            7,
            "Jackson Holliday",
            team(),
            shortstop(),
            PlayerStats::Batting(batting()),
            projection(),
        )
        .unwrap();
        let updated =
            player.with_projection(ProjectedStats::new(0.85, 4.2, Vec::new(), "2025"));
        assert_eq!(player.projected_stats().projected_debut, "2024");
        assert_eq!(updated.projected_stats().projected_debut, "2025");
        assert_eq!(updated.id(), player.id());
    }

    #[test]
    fn decodes_wire_format_and_enforces_single_stats_kind() {
        let mut value = json!({
            "id": 42,
            "fullName": "Jackson Holliday",
            "currentTeam": {
                "id": 110,
                "name": "Orioles",
                "abbreviation": "ORI",
                "teamName": "Orioles",
                "locationName": "Orioles",
                "division": { "id": 201, "name": "AL East" }
            },
            "position": { "code": "SS", "name": "Shortstop", "type": "Position Player" },
            "stats": {
                "batting": {
                    "avg": 0.3, "hr": 20, "rbi": 80, "obp": 0.38, "slg": 0.5,
                    "ops": 0.88, "games": 120, "atBats": 450, "hits": 135
                },
                "pitching": null
            },
            "projectedStats": {
                "careerProbability": 0.95,
                "peakWAR": 6.5,
                "similarPlayers": ["Mike Trout"],
                "projectedDebut": "2024"
            }
        });

        let player: Player = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(player.full_name(), "Jackson Holliday");
        assert!(player.stats().batting().is_some());
        assert!(player.stats().pitching().is_none());

        let encoded = serde_json::to_value(&player).unwrap();
        assert_eq!(encoded["stats"]["pitching"], serde_json::Value::Null);
        assert_eq!(encoded["position"]["type"], json!("Position Player"));

        value["stats"]["batting"] = serde_json::Value::Null;
        assert!(serde_json::from_value::<Player>(value).is_err());
    }
}
