use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// League division (e.g. `AL East`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Division {
    /// Numeric division identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
}

impl Division {
    /// Build a division from its id and display name.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Club a prospect currently belongs to.
///
/// Identity is `(id, name)` only: two records that agree on both but carry a
/// different division, abbreviation or location compare equal and hash to the
/// same bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Numeric team identifier.
    pub id: u32,
    /// Full club name (e.g. `Boston Red Sox`).
    pub name: String,
    /// Three-letter abbreviation.
    pub abbreviation: String,
    /// Short team name used by the division rosters (e.g. `Red Sox`).
    pub team_name: String,
    /// Location or city name.
    pub location_name: String,
    /// Division the club plays in.
    pub division: Division,
}

impl PartialEq for Team {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name
    }
}

impl Eq for Team {}

impl Hash for Team {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.name.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn team(id: u32, name: &str, division: Division) -> Team {
        Team {
            id,
            name: name.to_string(),
            abbreviation: name[..3].to_uppercase(),
            team_name: name.to_string(),
            location_name: name.to_string(),
            division,
        }
    }

    #[test]
    fn identity_ignores_division() {
        let east = team(111, "Red Sox", Division::new(201, "AL East"));
        let west = team(111, "Red Sox", Division::new(203, "AL West"));
        assert_eq!(east, west);

        let set: HashSet<Team> = [east, west].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn different_names_are_distinct() {
        let division = Division::new(201, "AL East");
        assert_ne!(
            team(111, "Red Sox", division.clone()),
            team(111, "Rays", division)
        );
    }
}
