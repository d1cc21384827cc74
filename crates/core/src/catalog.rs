//! Fixed league reference data: divisions, clubs and position names.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::models::{Division, Team};

/// Division display name paired with the short names of its five clubs.
pub type DivisionRoster = (&'static str, [&'static str; 5]);

/// The six divisions and their club rosters, keyed by short team name.
pub const DIVISIONS: [DivisionRoster; 6] = [
    (
        "AL East",
        ["Yankees", "Red Sox", "Blue Jays", "Rays", "Orioles"],
    ),
    (
        "AL Central",
        ["Twins", "Guardians", "Tigers", "White Sox", "Royals"],
    ),
    (
        "AL West",
        ["Rangers", "Astros", "Mariners", "Angels", "Athletics"],
    ),
    (
        "NL East",
        ["Braves", "Phillies", "Mets", "Marlins", "Nationals"],
    ),
    (
        "NL Central",
        ["Brewers", "Cubs", "Reds", "Pirates", "Cardinals"],
    ),
    (
        "NL West",
        ["Dodgers", "D-backs", "Giants", "Padres", "Rockies"],
    ),
];

/// Division assigned to a club name when building mock rosters.
static TEAM_DIVISIONS: Lazy<HashMap<&'static str, Division>> = Lazy::new(|| {
    let entries: [(&str, u32, &str); 30] = [
        ("Orioles", 201, "AL East"),
        ("Red Sox", 201, "AL East"),
        ("Yankees", 201, "AL East"),
        ("Rays", 201, "AL East"),
        ("Blue Jays", 201, "AL East"),
        ("White Sox", 202, "AL Central"),
        ("Guardians", 202, "AL Central"),
        ("Tigers", 202, "AL Central"),
        ("Royals", 202, "AL Central"),
        ("Twins", 202, "AL Central"),
        ("Astros", 203, "AL West"),
        ("Angels", 203, "AL West"),
        ("Athletics", 203, "AL West"),
        ("Mariners", 203, "AL West"),
        ("Rangers", 203, "AL West"),
        ("Braves", 204, "NL East"),
        ("Marlins", 204, "NL East"),
        ("Mets", 204, "NL East"),
        ("Phillies", 204, "NL East"),
        ("Nationals", 204, "NL East"),
        ("Cubs", 205, "NL Central"),
        ("Reds", 205, "NL Central"),
        ("Brewers", 205, "NL Central"),
        ("Pirates", 205, "NL Central"),
        ("Cardinals", 205, "NL Central"),
        ("Diamondbacks", 206, "NL West"),
        ("Rockies", 206, "NL West"),
        ("Dodgers", 206, "NL West"),
        ("Padres", 206, "NL West"),
        ("Giants", 206, "NL West"),
    ];
    entries
        .into_iter()
        .map(|(team, id, name)| (team, Division::new(id, name)))
        .collect()
});

static POSITION_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("C", "Catcher"),
        ("1B", "First Baseman"),
        ("2B", "Second Baseman"),
        ("3B", "Third Baseman"),
        ("SS", "Shortstop"),
        ("OF", "Outfielder"),
        ("LHP", "Left-Handed Pitcher"),
        ("RHP", "Right-Handed Pitcher"),
        ("UTL", "Utility Player"),
    ])
});

/// Short team names belonging to `division`; empty for an unknown division.
pub fn division_roster(division: &str) -> &'static [&'static str] {
    DIVISIONS
        .iter()
        .find(|(name, _)| *name == division)
        .map(|(_, teams)| teams.as_slice())
        .unwrap_or(&[])
}

/// Division names in alphabetical order.
pub fn division_names() -> Vec<&'static str> {
    let mut names: Vec<_> = DIVISIONS.iter().map(|(name, _)| *name).collect();
    names.sort_unstable();
    names
}

/// Division for a club's short name, or `Unknown` (id 200).
pub fn division_for_team(team_name: &str) -> Division {
    TEAM_DIVISIONS
        .get(team_name)
        .cloned()
        .unwrap_or_else(|| Division::new(200, "Unknown"))
}

/// Display name for a position code, falling back to the code itself.
pub fn position_name(code: &str) -> String {
    POSITION_NAMES
        .get(code)
        .map(|name| name.to_string())
        .unwrap_or_else(|| code.to_string())
}

/// The clubs with full metadata known to the application.
pub fn all_teams() -> Vec<Team> {
    [
        (119, "Los Angeles Dodgers", "LAD", "Dodgers", "Los Angeles", 203, "NL West"),
        (111, "Boston Red Sox", "BOS", "Red Sox", "Boston", 201, "AL East"),
        (142, "Minnesota Twins", "MIN", "Twins", "Minnesota", 202, "AL Central"),
        (120, "Washington Nationals", "WSH", "Nationals", "Washington", 204, "NL East"),
        (116, "Detroit Tigers", "DET", "Tigers", "Detroit", 202, "AL Central"),
    ]
    .into_iter()
    .map(
        |(id, name, abbreviation, team_name, location_name, division_id, division_name)| Team {
            id,
            name: name.to_string(),
            abbreviation: abbreviation.to_string(),
            team_name: team_name.to_string(),
            location_name: location_name.to_string(),
            division: Division::new(division_id, division_name),
        },
    )
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rosters_resolve_by_division_name() {
        assert_eq!(
            division_roster("AL East"),
            &["Yankees", "Red Sox", "Blue Jays", "Rays", "Orioles"]
        );
        assert!(division_roster("Unknown Division").is_empty());
        assert_eq!(DIVISIONS.iter().map(|(_, t)| t.len()).sum::<usize>(), 30);
    }

    #[test]
    fn division_names_are_sorted() {
        assert_eq!(
            division_names(),
            vec![
                "AL Central",
                "AL East",
                "AL West",
                "NL Central",
                "NL East",
                "NL West"
            ]
        );
    }

    #[test]
    fn lookups_fall_back() {
        assert_eq!(division_for_team("Rays"), Division::new(201, "AL East"));
        assert_eq!(division_for_team("Expos"), Division::new(200, "Unknown"));
        assert_eq!(position_name("SS"), "Shortstop");
        assert_eq!(position_name("DH"), "DH");
    }

    #[test]
    fn static_teams_carry_full_metadata() {
        let teams = all_teams();
        assert_eq!(teams.len(), 5);
        let red_sox = teams.iter().find(|t| t.team_name == "Red Sox").unwrap();
        assert_eq!(red_sox.abbreviation, "BOS");
        assert_eq!(red_sox.division.name, "AL East");
    }
}
