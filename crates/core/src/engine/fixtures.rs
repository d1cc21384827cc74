//! Player builders shared by the engine tests.

use crate::{
    catalog,
    models::{
        BattingStats, PitchingStats, Player, PlayerStats, Position, PositionType, ProjectedStats,
        Team,
    },
};

pub(crate) fn team(name: &str) -> Team {
    Team {
        id: 100,
        name: name.to_string(),
        abbreviation: name.chars().take(3).collect::<String>().to_uppercase(),
        team_name: name.to_string(),
        location_name: name.to_string(),
        division: catalog::division_for_team(name),
    }
}

pub(crate) fn prospect(
    id: u64,
    name: &str,
    team_name: &str,
    code: &str,
    prob: f64,
    war: f64,
    debut: &str,
) -> Player {
    let kind = PositionType::from_code(code);
    let stats = match kind {
        PositionType::Pitcher => PlayerStats::Pitching(PitchingStats {
            era: 3.1,
            wins: 9,
            losses: 5,
            saves: 0,
            strikeouts: 140,
            innings: 120.0,
            whip: 1.08,
            games: 24,
            games_started: 22,
        }),
        PositionType::PositionPlayer => PlayerStats::Batting(BattingStats {
            avg: 0.281,
            hr: 17,
            rbi: 66,
            obp: 0.355,
            slg: 0.470,
            ops: 0.825,
            games: 118,
            at_bats: 430,
            hits: 121,
        }),
    };
    Player::new(
        id,
        name,
        team(team_name),
        Position {
            code: code.to_string(),
            name: catalog::position_name(code),
            kind,
        },
        stats,
        ProjectedStats::new(prob, war, Vec::new(), debut),
    )
    .expect("fixture player is valid")
}

pub(crate) fn hitter(id: u64, name: &str, prob: f64, war: f64) -> Player {
    prospect(id, name, "Orioles", "SS", prob, war, "2024")
}

pub(crate) fn names(players: &[Player]) -> Vec<&str> {
    players.iter().map(Player::full_name).collect()
}
