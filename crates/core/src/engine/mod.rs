//! In-memory prospect query engine.
//!
//! The engine owns the loaded players and the team catalog. Every query
//! returns copies, never a view into the backing collection, and every query
//! is total: unknown names, empty inputs and ties produce empty or default
//! results instead of errors.

pub mod analytics;
#[cfg(test)]
pub(crate) mod fixtures;
mod shared;

use std::{collections::BTreeMap, future::Future};

use anyhow::Result;
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    catalog,
    models::{Player, PositionType, ProjectedStats, Team},
};

pub use shared::SharedEngine;

/// Career probability at or above which a prospect counts as impact.
pub const IMPACT_PROBABILITY: f64 = 0.8;
/// Peak WAR at or above which a prospect counts as impact.
pub const IMPACT_WAR: f64 = 3.0;

/// Ordering applied by [`sort_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    /// Career probability, highest first.
    #[default]
    Probability,
    /// Full name, ascending.
    Name,
    /// Club name, ascending.
    Team,
}

impl SortKey {
    /// Every key in presentation order.
    pub const ALL: [SortKey; 3] = [SortKey::Probability, SortKey::Name, SortKey::Team];

    /// Label shown next to the sort control.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Probability => "MLB Probability",
            Self::Name => "Name",
            Self::Team => "Team",
        }
    }

    /// The key after this one, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Probability => Self::Name,
            Self::Name => Self::Team,
            Self::Team => Self::Probability,
        }
    }
}

/// Highest peak-WAR prospect in a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProspect {
    /// Full name.
    pub name: String,
    /// Projected peak WAR.
    pub peak_war: f64,
}

/// Aggregates shown on the analytics screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Mean career probability; `0.0` for no players.
    pub average_career_probability: f64,
    /// Players projected to debut in the reference year.
    pub next_year_debut_count: usize,
    /// First player holding the maximum peak WAR.
    pub top_prospect: Option<TopProspect>,
    /// Players meeting both [`IMPACT_PROBABILITY`] and [`IMPACT_WAR`].
    pub impact_player_count: usize,
}

/// A prediction that could not be applied to one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshFailure {
    /// Id of the untouched player.
    pub player_id: u64,
    /// Full name of the untouched player.
    pub player_name: String,
    /// Predictor or validation error, with context.
    pub reason: String,
}

/// Outcome of a projection refresh across the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshReport {
    /// Predictions requested.
    pub attempted: usize,
    /// Players whose projection was replaced.
    pub updated: usize,
    /// Players left untouched because their prediction failed.
    pub failures: Vec<RefreshFailure>,
}

impl RefreshReport {
    /// True when every prediction was applied.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record_failure(&mut self, player: &Player, err: &anyhow::Error) {
        warn!(
            player_id = player.id(),
            player = player.full_name(),
            "projection refresh failed: {err:#}"
        );
        self.failures.push(RefreshFailure {
            player_id: player.id(),
            player_name: player.full_name().to_string(),
            reason: format!("{err:#}"),
        });
    }

    pub(crate) fn log_completion(&self) {
        info!(
            attempted = self.attempted,
            updated = self.updated,
            failed = self.failures.len(),
            "Projection refresh finished"
        );
    }
}

/// Validate a predictor outcome so out-of-domain projections count as failures.
pub(crate) fn checked(outcome: Result<ProjectedStats>) -> Result<ProjectedStats> {
    let projection = outcome?;
    projection.validate()?;
    Ok(projection)
}

/// Holds the session's players and team catalog.
#[derive(Debug, Clone)]
pub struct ProspectEngine {
    players: Vec<Player>,
    teams: Vec<Team>,
}

impl Default for ProspectEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProspectEngine {
    /// Empty engine over the built-in team catalog.
    pub fn new() -> Self {
        Self::with_teams(catalog::all_teams())
    }

    /// Empty engine over a caller-supplied team catalog.
    pub fn with_teams(teams: Vec<Team>) -> Self {
        Self {
            players: Vec::new(),
            teams,
        }
    }

    /// Replace the entire player collection. Nothing from the previous
    /// collection survives.
    pub fn load(&mut self, players: Vec<Player>) {
        self.players = players;
        info!(total = self.players.len(), "Prospects loaded");
    }

    /// Snapshot of the current collection in load order.
    pub fn players(&self) -> Vec<Player> {
        self.players.clone()
    }

    /// Number of loaded players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// True when no players are loaded.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// The team catalog.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Catalog team with the given short name.
    pub fn team_named(&self, team_name: &str) -> Option<&Team> {
        self.teams.iter().find(|team| team.team_name == team_name)
    }

    /// Ask `predictor` for a fresh projection for every player.
    ///
    /// A failing prediction leaves that player's projection unchanged and is
    /// logged and recorded in the report; the remaining players are still
    /// processed.
    pub fn refresh_projections<F>(&mut self, mut predictor: F) -> RefreshReport
    where
        F: FnMut(&Player) -> Result<ProjectedStats>,
    {
        let mut report = RefreshReport::default();
        for slot in self.players.iter_mut() {
            let outcome = checked(predictor(&*slot));
            apply_prediction(slot, outcome, &mut report);
        }
        report.log_completion();
        report
    }

    /// Async form of [`ProspectEngine::refresh_projections`]; predictions are
    /// awaited one player at a time.
    pub async fn refresh_projections_async<F, Fut>(&mut self, mut predictor: F) -> RefreshReport
    where
        F: FnMut(Player) -> Fut,
        Fut: Future<Output = Result<ProjectedStats>>,
    {
        let mut report = RefreshReport::default();
        for index in 0..self.players.len() {
            let outcome = checked(predictor(self.players[index].clone()).await);
            apply_prediction(&mut self.players[index], outcome, &mut report);
        }
        report.log_completion();
        report
    }

    /// Swap in a projection for the player at `index`, provided the slot
    /// still holds `player_id`.
    pub(crate) fn replace_projection(
        &mut self,
        index: usize,
        player_id: u64,
        projection: ProjectedStats,
    ) -> bool {
        match self.players.get_mut(index) {
            Some(slot) if slot.id() == player_id => {
                *slot = slot.with_projection(projection);
                true
            }
            _ => false,
        }
    }

    /// Players whose club name equals `name` exactly.
    pub fn filter_by_team_name(&self, name: &str) -> Vec<Player> {
        self.players
            .iter()
            .filter(|player| player.current_team().name == name)
            .cloned()
            .collect()
    }

    /// Players whose club appears in the roster of `division`. Unknown
    /// divisions have an empty roster.
    pub fn filter_by_division(&self, division: &str) -> Vec<Player> {
        let roster = catalog::division_roster(division);
        let matches: Vec<Player> = self
            .players
            .iter()
            .filter(|player| roster.contains(&player.current_team().team_name.as_str()))
            .cloned()
            .collect();
        debug!(division, matches = matches.len(), "division filter");
        matches
    }

    /// Case-insensitive substring search over full names.
    pub fn search(&self, text: &str) -> Vec<Player> {
        search_in(&self.players, text)
    }

    /// Number of players on the club named `name`.
    pub fn team_prospect_count(&self, name: &str) -> usize {
        self.players
            .iter()
            .filter(|player| player.current_team().name == name)
            .count()
    }

    /// Number of players in `division`.
    pub fn division_prospect_count(&self, division: &str) -> usize {
        let roster = catalog::division_roster(division);
        self.players
            .iter()
            .filter(|player| roster.contains(&player.current_team().team_name.as_str()))
            .count()
    }
}

fn apply_prediction(
    slot: &mut Player,
    outcome: Result<ProjectedStats>,
    report: &mut RefreshReport,
) {
    report.attempted += 1;
    match outcome {
        Ok(projection) => {
            *slot = slot.with_projection(projection);
            report.updated += 1;
        }
        Err(err) => report.record_failure(slot, &err),
    }
}

/// Case-insensitive substring search over `players`; empty text keeps all.
pub fn search_in(players: &[Player], text: &str) -> Vec<Player> {
    if text.is_empty() {
        return players.to_vec();
    }
    let needle = text.to_lowercase();
    let matches: Vec<Player> = players
        .iter()
        .filter(|player| player.full_name().to_lowercase().contains(&needle))
        .cloned()
        .collect();
    debug!(query = text, matches = matches.len(), "search");
    matches
}

/// Stable sort of `players` by `key`.
pub fn sort_by(players: &[Player], key: SortKey) -> Vec<Player> {
    let mut sorted = players.to_vec();
    match key {
        SortKey::Probability => sorted.sort_by(|a, b| {
            b.projected_stats()
                .career_probability
                .total_cmp(&a.projected_stats().career_probability)
        }),
        SortKey::Name => sorted.sort_by(|a, b| a.full_name().cmp(b.full_name())),
        SortKey::Team => {
            sorted.sort_by(|a, b| a.current_team().name.cmp(&b.current_team().name))
        }
    }
    sorted
}

/// Partition `players` by position type, keeping input order in each group.
pub fn group_by_position_type(players: &[Player]) -> BTreeMap<PositionType, Vec<Player>> {
    let mut groups: BTreeMap<PositionType, Vec<Player>> = BTreeMap::new();
    for player in players {
        groups
            .entry(player.position().kind)
            .or_default()
            .push(player.clone());
    }
    groups
}

/// Summary with "next year" taken from the local calendar.
pub fn summary_statistics(players: &[Player]) -> Summary {
    summary_statistics_for_year(players, Local::now().year() + 1)
}

/// Summary counting debuts in `debut_year`.
pub fn summary_statistics_for_year(players: &[Player], debut_year: i32) -> Summary {
    if players.is_empty() {
        return Summary::default();
    }

    let total: f64 = players
        .iter()
        .map(|player| player.projected_stats().career_probability)
        .sum();
    let debut = debut_year.to_string();
    let next_year_debut_count = players
        .iter()
        .filter(|player| player.projected_stats().projected_debut == debut)
        .count();

    let top_prospect = players
        .iter()
        .fold(None::<&Player>, |best, player| match best {
            Some(current)
                if current.projected_stats().peak_war >= player.projected_stats().peak_war =>
            {
                Some(current)
            }
            _ => Some(player),
        })
        .map(|player| TopProspect {
            name: player.full_name().to_string(),
            peak_war: player.projected_stats().peak_war,
        });

    let impact_player_count = players
        .iter()
        .filter(|player| {
            let projection = player.projected_stats();
            projection.career_probability >= IMPACT_PROBABILITY
                && projection.peak_war >= IMPACT_WAR
        })
        .count();

    Summary {
        average_career_probability: total / players.len() as f64,
        next_year_debut_count,
        top_prospect,
        impact_player_count,
    }
}
