//! Built-in prospect roster used when no roster file is configured.
//!
//! Projections are fixed; current-season lines, ids and comparables come from
//! a seeded generator so a given seed always yields the same roster.

use tinyrand::{Rand, Seeded, StdRand};

use crate::{
    catalog,
    models::{
        BattingStats, ModelError, PitchingStats, Player, PlayerStats, Position, PositionType,
        ProjectedStats, Team,
    },
};

/// Seed used by [`top_prospects`].
pub const DEFAULT_SEED: u64 = 2024;

/// (name, club, position code, career probability, peak WAR, debut)
type ProspectRow = (&'static str, &'static str, &'static str, f64, f64, &'static str);

const TOP_PROSPECTS: [ProspectRow; 30] = [
    // AL East
    ("Jackson Holliday", "Orioles", "SS", 0.95, 6.5, "2024"),
    ("Junior Caminero", "Rays", "3B", 0.92, 5.8, "2024"),
    ("Marcelo Mayer", "Red Sox", "SS", 0.88, 5.2, "2024"),
    ("Spencer Jones", "Yankees", "OF", 0.85, 4.8, "2025"),
    ("Ricky Tiedemann", "Blue Jays", "LHP", 0.87, 4.9, "2024"),
    // AL Central
    ("Jackson Merrill", "White Sox", "SS", 0.89, 5.1, "2024"),
    ("Chase DeLauter", "Guardians", "OF", 0.86, 4.7, "2025"),
    ("Max Clark", "Tigers", "OF", 0.88, 5.0, "2026"),
    ("Brooks Lee", "Twins", "SS", 0.87, 4.8, "2024"),
    ("Nick Loftin", "Royals", "UTL", 0.83, 4.2, "2024"),
    // AL West
    ("Wyatt Langford", "Rangers", "OF", 0.93, 6.0, "2024"),
    ("Jacob Wilson", "Athletics", "SS", 0.85, 4.6, "2024"),
    ("Drew Gilbert", "Astros", "OF", 0.84, 4.5, "2024"),
    ("Harry Ford", "Mariners", "C", 0.86, 4.8, "2025"),
    ("Zach Neto", "Angels", "SS", 0.88, 4.9, "2024"),
    // NL East
    ("Dylan Crews", "Nationals", "OF", 0.94, 6.2, "2024"),
    ("Jett Williams", "Mets", "SS", 0.87, 4.8, "2025"),
    ("Thomas Saggese", "Braves", "INF", 0.82, 4.1, "2024"),
    ("Ethan Salas", "Marlins", "C", 0.89, 5.2, "2026"),
    ("Andrew Painter", "Phillies", "RHP", 0.90, 5.5, "2024"),
    // NL Central
    ("Paul Skenes", "Pirates", "RHP", 0.94, 6.1, "2024"),
    ("Pete Crow-Armstrong", "Cubs", "OF", 0.91, 5.4, "2024"),
    ("Jordan Walker", "Cardinals", "OF", 0.92, 5.7, "2024"),
    ("Jacob Misiorowski", "Brewers", "RHP", 0.85, 4.7, "2025"),
    ("Rhett Lowder", "Reds", "RHP", 0.86, 4.8, "2025"),
    // NL West
    ("Jordan Lawlar", "Diamondbacks", "SS", 0.91, 5.6, "2024"),
    ("Kyle Harrison", "Giants", "LHP", 0.88, 5.0, "2024"),
    ("Jackson Merrill", "Padres", "SS", 0.89, 5.2, "2024"),
    ("Gavin Williams", "Dodgers", "RHP", 0.87, 4.9, "2024"),
    ("Adael Amador", "Rockies", "SS", 0.85, 4.6, "2024"),
];

const PITCHER_COMPS: [&str; 5] = [
    "Max Scherzer",
    "Justin Verlander",
    "Clayton Kershaw",
    "Gerrit Cole",
    "Jacob deGrom",
];

const HITTER_COMPS: [&str; 5] = [
    "Mike Trout",
    "Ronald Acuña Jr.",
    "Juan Soto",
    "Fernando Tatis Jr.",
    "Mookie Betts",
];

/// The mock roster generated from [`DEFAULT_SEED`].
pub fn top_prospects() -> Result<Vec<Player>, ModelError> {
    top_prospects_seeded(DEFAULT_SEED)
}

/// The mock roster generated from `seed`.
pub fn top_prospects_seeded(seed: u64) -> Result<Vec<Player>, ModelError> {
    let mut rand = StdRand::seed(seed);
    TOP_PROSPECTS
        .iter()
        .map(|row| build_prospect(&mut rand, row))
        .collect()
}

fn build_prospect(rand: &mut impl Rand, row: &ProspectRow) -> Result<Player, ModelError> {
    let &(name, team, code, probability, war, debut) = row;
    let kind = PositionType::from_code(code);
    let position = Position {
        code: code.to_string(),
        name: catalog::position_name(code),
        kind,
    };
    let current_team = Team {
        id: between(rand, 100, 200),
        name: team.to_string(),
        abbreviation: team.chars().take(3).collect::<String>().to_uppercase(),
        team_name: team.to_string(),
        location_name: team.to_string(),
        division: catalog::division_for_team(team),
    };
    let stats = generate_stats(rand, kind);
    let projection = ProjectedStats::new(probability, war, similar_players(rand, kind), debut);

    Player::new(
        u64::from(between(rand, 100_000, 999_999)),
        name,
        current_team,
        position,
        stats,
        projection,
    )
}

fn generate_stats(rand: &mut impl Rand, kind: PositionType) -> PlayerStats {
    match kind {
        PositionType::Pitcher => PlayerStats::Pitching(PitchingStats {
            era: round_to(uniform(rand, 2.0, 4.0), 2),
            wins: between(rand, 5, 15),
            losses: between(rand, 2, 10),
            saves: 0,
            strikeouts: between(rand, 80, 200),
            innings: round_to(uniform(rand, 80.0, 180.0), 1),
            whip: round_to(uniform(rand, 0.9, 1.3), 2),
            games: between(rand, 20, 30),
            games_started: between(rand, 15, 25),
        }),
        PositionType::PositionPlayer => PlayerStats::Batting(BattingStats {
            avg: round_to(uniform(rand, 0.250, 0.320), 3),
            hr: between(rand, 10, 30),
            rbi: between(rand, 40, 100),
            obp: round_to(uniform(rand, 0.320, 0.400), 3),
            slg: round_to(uniform(rand, 0.400, 0.550), 3),
            ops: round_to(uniform(rand, 0.720, 0.950), 3),
            games: between(rand, 100, 140),
            at_bats: between(rand, 300, 500),
            hits: between(rand, 80, 160),
        }),
    }
}

/// Two distinct comparables from the pool matching `kind`.
fn similar_players(rand: &mut impl Rand, kind: PositionType) -> Vec<String> {
    let pool = match kind {
        PositionType::Pitcher => &PITCHER_COMPS,
        PositionType::PositionPlayer => &HITTER_COMPS,
    };
    let first = (rand.next_u64() % pool.len() as u64) as usize;
    let offset = 1 + (rand.next_u64() % (pool.len() as u64 - 1)) as usize;
    let second = (first + offset) % pool.len();
    vec![pool[first].to_string(), pool[second].to_string()]
}

fn uniform(rand: &mut impl Rand, low: f64, high: f64) -> f64 {
    low + (high - low) * (rand.next_u64() as f64 / u64::MAX as f64)
}

fn between(rand: &mut impl Rand, low: u32, high: u32) -> u32 {
    low + (rand.next_u64() % u64::from(high - low + 1)) as u32
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_matches_reference_list() {
        let players = top_prospects().unwrap();
        assert_eq!(players.len(), 30);
        assert_eq!(players[0].full_name(), "Jackson Holliday");
        assert_eq!(players[0].current_team().name, "Orioles");
        assert_eq!(players[0].current_team().abbreviation, "ORI");
        assert_eq!(players[0].current_team().division.name, "AL East");
        assert_eq!(players[0].position().name, "Shortstop");
    }

    #[test]
    fn stats_follow_position_type() {
        for player in top_prospects().unwrap() {
            match player.position().kind {
                PositionType::Pitcher => {
                    assert!(player.stats().pitching().is_some());
                    assert!(player.stats().batting().is_none());
                }
                PositionType::PositionPlayer => {
                    assert!(player.stats().batting().is_some());
                    assert!(player.stats().pitching().is_none());
                }
            }
            let similar = &player.projected_stats().similar_players;
            assert_eq!(similar.len(), 2);
            assert_ne!(similar[0], similar[1]);
        }
    }

    #[test]
    fn generation_is_reproducible_per_seed() {
        assert_eq!(top_prospects_seeded(7).unwrap(), top_prospects_seeded(7).unwrap());
    }

    #[test]
    fn generated_lines_stay_in_range() {
        for player in top_prospects_seeded(99).unwrap() {
            if let Some(batting) = player.stats().batting() {
                assert!((0.25..=0.32).contains(&batting.avg));
                assert!((10..=30).contains(&batting.hr));
            }
            if let Some(pitching) = player.stats().pitching() {
                assert!((2.0..=4.0).contains(&pitching.era));
                assert_eq!(pitching.saves, 0);
            }
            assert!((100..=200).contains(&player.current_team().id));
        }
    }

    #[test]
    fn catalog_lookups_fill_division_and_position() {
        let players = top_prospects().unwrap();
        let lawlar = players
            .iter()
            .find(|p| p.full_name() == "Jordan Lawlar")
            .unwrap();
        assert_eq!(lawlar.current_team().division.name, "NL West");
        let saggese = players
            .iter()
            .find(|p| p.full_name() == "Thomas Saggese")
            .unwrap();
        assert_eq!(saggese.position().name, "INF");
    }
}
