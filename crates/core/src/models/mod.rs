//! Shared domain models.

mod player;
mod team;

pub use player::{
    BattingStats, ModelError, PitchingStats, Player, PlayerStats, Position, PositionType,
    ProjectedStats, MAX_SIMILAR_PLAYERS,
};
pub use team::{Division, Team};

impl Player {
    /// Returns a user-facing label combining name, position code and club.
    pub fn display_name(&self) -> String {
        format!(
            "{} · {} · {}",
            self.full_name(),
            self.position().code,
            self.current_team().name
        )
    }
}
