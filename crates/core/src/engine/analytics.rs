#![allow(missing_docs)]

//! Chart-oriented views over a set of players.

use std::collections::HashMap;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::Player;

/// Number of bars in the peak-WAR chart.
pub const TOP_WAR_LIMIT: usize = 10;
/// Number of equal-width bands in the probability chart.
pub const PROBABILITY_BUCKETS: usize = 5;

/// Look-back window applied to projected debuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeFrame {
    SixMonths,
    #[default]
    OneYear,
    TwoYears,
}

impl TimeFrame {
    pub const ALL: [TimeFrame; 3] = [
        TimeFrame::SixMonths,
        TimeFrame::OneYear,
        TimeFrame::TwoYears,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::SixMonths => "6 Months",
            Self::OneYear => "1 Year",
            Self::TwoYears => "2 Years",
        }
    }

    pub fn months(&self) -> u32 {
        match self {
            Self::SixMonths => 6,
            Self::OneYear => 12,
            Self::TwoYears => 24,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::SixMonths => Self::OneYear,
            Self::OneYear => Self::TwoYears,
            Self::TwoYears => Self::SixMonths,
        }
    }

    /// Whether January 1st of `debut` falls in `[today - months, today)`.
    /// Debuts that are not a year never match.
    pub fn contains_debut(&self, debut: &str, today: NaiveDate) -> bool {
        let Some(debut_date) = debut
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        else {
            return false;
        };
        let start = today
            .checked_sub_months(Months::new(self.months()))
            .unwrap_or(NaiveDate::MIN);
        start <= debut_date && debut_date < today
    }
}

/// Players whose projected debut falls inside `frame` as of `today`.
pub fn filter_by_timeframe(
    players: &[Player],
    frame: TimeFrame,
    today: NaiveDate,
) -> Vec<Player> {
    players
        .iter()
        .filter(|player| frame.contains_debut(&player.projected_stats().projected_debut, today))
        .cloned()
        .collect()
}

/// Player counts per position display name, largest first, ties by name.
pub fn position_distribution(players: &[Player]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for player in players {
        *counts.entry(player.position().name.as_str()).or_default() += 1;
    }
    let mut distribution: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    distribution
}

/// Players whose career probability falls in `[lower, upper)`; the last
/// band also holds `upper` itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl ProbabilityBucket {
    /// Percent range, e.g. `40-60%`.
    pub fn label(&self) -> String {
        format!("{:.0}-{:.0}%", self.lower * 100.0, self.upper * 100.0)
    }
}

/// Histogram of career probability over `buckets` equal bands of `[0, 1]`,
/// lowest band first. Values outside the range land in the end bands.
pub fn probability_distribution(players: &[Player], buckets: usize) -> Vec<ProbabilityBucket> {
    let mut distribution: Vec<ProbabilityBucket> = (0..buckets)
        .map(|index| ProbabilityBucket {
            lower: index as f64 / buckets as f64,
            upper: (index + 1) as f64 / buckets as f64,
            count: 0,
        })
        .collect();
    if buckets == 0 {
        return distribution;
    }
    for player in players {
        let probability = player.projected_stats().career_probability;
        let index = (probability * buckets as f64).floor().max(0.0) as usize;
        distribution[index.min(buckets - 1)].count += 1;
    }
    distribution
}

/// Up to `limit` players by peak WAR, highest first.
pub fn top_by_war(players: &[Player], limit: usize) -> Vec<Player> {
    let mut ranked = players.to_vec();
    ranked.sort_by(|a, b| {
        b.projected_stats()
            .peak_war
            .total_cmp(&a.projected_stats().peak_war)
    });
    ranked.truncate(limit);
    ranked
}

/// Players ordered by projected debut, earliest first.
pub fn debut_timeline(players: &[Player]) -> Vec<Player> {
    let mut timeline = players.to_vec();
    timeline.sort_by(|a, b| {
        a.projected_stats()
            .projected_debut
            .cmp(&b.projected_stats().projected_debut)
    });
    timeline
}

/// Band a career probability falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProbabilityTier {
    Elite,
    Strong,
    Moderate,
    LongShot,
}

impl ProbabilityTier {
    pub fn classify(probability: f64) -> Self {
        if probability >= 0.8 {
            Self::Elite
        } else if probability >= 0.6 {
            Self::Strong
        } else if probability >= 0.4 {
            Self::Moderate
        } else {
            Self::LongShot
        }
    }
}

/// Band a peak WAR falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarTier {
    Star,
    Regular,
    Contributor,
    Fringe,
}

impl WarTier {
    pub fn classify(war: f64) -> Self {
        if war >= 5.0 {
            Self::Star
        } else if war >= 3.0 {
            Self::Regular
        } else if war >= 1.0 {
            Self::Contributor
        } else {
            Self::Fringe
        }
    }
}
