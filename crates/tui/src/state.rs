//! Navigation state that does not touch the terminal.

use curve_core::{
    engine::{analytics::TimeFrame, group_by_position_type, SortKey},
    models::{Player, PositionType},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Prospects,
    Teams,
    Analytics,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Prospects, Tab::Teams, Tab::Analytics, Tab::Settings];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Prospects => "Prospects",
            Self::Teams => "Teams",
            Self::Analytics => "Analytics",
            Self::Settings => "Settings",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|tab| tab == self).unwrap_or(0)
    }

    pub fn from_digit(ch: char) -> Option<Self> {
        let index = ch.to_digit(10)? as usize;
        Self::ALL.get(index.checked_sub(1)?).copied()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Browse,
    Search,
}

/// Chart shown on the analytics tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Probability,
    Positions,
    PeakWar,
    DebutTimeline,
}

impl ChartKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Probability => "Success Probability",
            Self::Positions => "Position Distribution",
            Self::PeakWar => "Peak WAR Leaders",
            Self::DebutTimeline => "Debut Timeline",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Probability => Self::Positions,
            Self::Positions => Self::PeakWar,
            Self::PeakWar => Self::DebutTimeline,
            Self::DebutTimeline => Self::Probability,
        }
    }
}

/// Cursor plus scroll offset over a list of `len` rows.
#[derive(Debug, Clone, Default)]
pub struct ListCursor {
    pub cursor: usize,
    pub offset: usize,
    pub height: usize,
}

impl ListCursor {
    pub fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let target = (self.cursor as isize + delta).clamp(0, len as isize - 1);
        self.cursor = target as usize;
    }

    pub fn move_to(&mut self, index: usize, len: usize) {
        self.cursor = index.min(len.saturating_sub(1));
    }

    pub fn page(&mut self, direction: isize, len: usize) {
        let step = self.height.max(1).min(len.max(1)) as isize;
        self.move_by(step * direction.signum(), len);
    }

    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.offset = 0;
    }

    /// Scroll so that `row` of `rows` is on screen.
    pub fn reveal(&mut self, row: usize, rows: usize) {
        if rows == 0 || self.height == 0 {
            self.offset = 0;
            return;
        }
        if row < self.offset {
            self.offset = row;
        } else if row >= self.offset + self.height {
            self.offset = row + 1 - self.height;
        }
        self.offset = self.offset.min(rows.saturating_sub(self.height));
    }
}

/// One line of the grouped prospect list.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Header { kind: PositionType, count: usize },
    Player(Player),
}

/// Players grouped by position type under header rows, in group order.
#[derive(Debug, Clone, Default)]
pub struct ProspectRows {
    pub rows: Vec<Row>,
    /// Row index of each player, in display order.
    pub player_rows: Vec<usize>,
}

impl ProspectRows {
    pub fn build(players: &[Player]) -> Self {
        let mut rows = Vec::new();
        let mut player_rows = Vec::new();
        for (kind, group) in group_by_position_type(players) {
            rows.push(Row::Header {
                kind,
                count: group.len(),
            });
            for player in group {
                player_rows.push(rows.len());
                rows.push(Row::Player(player));
            }
        }
        Self { rows, player_rows }
    }

    pub fn player_count(&self) -> usize {
        self.player_rows.len()
    }

    pub fn player(&self, ordinal: usize) -> Option<&Player> {
        match self.rows.get(*self.player_rows.get(ordinal)?) {
            Some(Row::Player(player)) => Some(player),
            _ => None,
        }
    }

    pub fn row_of(&self, ordinal: usize) -> Option<usize> {
        self.player_rows.get(ordinal).copied()
    }
}

/// Everything the key handlers mutate.
#[derive(Debug)]
pub struct UiState {
    pub tab: Tab,
    pub mode: Mode,
    pub search: String,
    pub sort: SortKey,
    pub prospects: ListCursor,
    pub divisions: ListCursor,
    pub settings: ListCursor,
    pub time_frame: TimeFrame,
    pub chart: ChartKind,
    pub status: String,
    pub should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: Tab::default(),
            mode: Mode::default(),
            search: String::new(),
            sort: SortKey::default(),
            prospects: ListCursor::default(),
            divisions: ListCursor::default(),
            settings: ListCursor::default(),
            time_frame: TimeFrame::default(),
            chart: ChartKind::default(),
            status: "Ready".to_string(),
            should_quit: false,
        }
    }
}

impl UiState {
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.mode = Mode::Browse;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve_core::source::mock;

    #[test]
    fn tabs_cycle_and_map_digits() {
        assert_eq!(Tab::from_digit('1'), Some(Tab::Prospects));
        assert_eq!(Tab::from_digit('4'), Some(Tab::Settings));
        assert_eq!(Tab::from_digit('0'), None);
        assert_eq!(Tab::from_digit('5'), None);
        assert_eq!(Tab::Settings.next(), Tab::Prospects);
        assert_eq!(Tab::Prospects.previous(), Tab::Settings);
    }

    #[test]
    fn charts_start_on_probability_and_cycle() {
        let mut chart = ChartKind::default();
        assert_eq!(chart, ChartKind::Probability);
        for _ in 0..4 {
            chart = chart.next();
        }
        assert_eq!(chart, ChartKind::Probability);
        assert_eq!(ChartKind::DebutTimeline.next(), ChartKind::Probability);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut list = ListCursor {
            height: 3,
            ..ListCursor::default()
        };
        list.move_by(-1, 10);
        assert_eq!(list.cursor, 0);
        list.page(1, 10);
        assert_eq!(list.cursor, 3);
        list.move_by(100, 10);
        assert_eq!(list.cursor, 9);
        list.reveal(list.cursor, 10);
        assert_eq!(list.offset, 7);
        list.clamp(4);
        assert_eq!(list.cursor, 3);
        list.move_by(1, 0);
        assert_eq!(list.cursor, 0);
    }

    #[test]
    fn reveal_scrolls_back_up() {
        let mut list = ListCursor {
            cursor: 0,
            offset: 5,
            height: 4,
        };
        list.reveal(2, 12);
        assert_eq!(list.offset, 2);
        list.reveal(0, 2);
        assert_eq!(list.offset, 0);
    }

    #[test]
    fn rows_group_players_under_headers() {
        let players = mock::top_prospects().unwrap();
        let rows = ProspectRows::build(&players);
        assert_eq!(rows.player_count(), players.len());
        assert_eq!(rows.rows.len(), players.len() + 2);
        assert_eq!(
            rows.rows[0],
            Row::Header {
                kind: PositionType::Pitcher,
                count: 7,
            }
        );
        assert_eq!(rows.row_of(0), Some(1));
        assert_eq!(rows.row_of(7), Some(9));
        assert_eq!(rows.player(0).map(Player::full_name), Some("Ricky Tiedemann"));
        assert!(rows.player(players.len()).is_none());
    }

    #[test]
    fn empty_roster_has_no_rows() {
        let rows = ProspectRows::build(&[]);
        assert!(rows.rows.is_empty());
        assert_eq!(rows.player(0), None);
    }
}
