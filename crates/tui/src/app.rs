use std::{cmp, io, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use curve_core::{
    catalog,
    config::AppConfig,
    engine::{
        self,
        analytics::{self, ProbabilityTier, TimeFrame, WarTier, PROBABILITY_BUCKETS, TOP_WAR_LIMIT},
        RefreshReport, SharedEngine, SortKey, Summary,
    },
    models::{Player, PlayerStats},
    settings::{SettingKey, Settings, SettingsStore, FONT_SCALE_MAX, FONT_SCALE_MIN},
    source::{self, RosterSnapshot, StatsService},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, ListState, Paragraph,
        Tabs, Wrap,
    },
    Frame, Terminal,
};
use tokio::{spawn, sync::mpsc, task};
use tracing::{error, info, warn};

use crate::state::{ChartKind, ListCursor, Mode, ProspectRows, Row, Tab, UiState};

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_INPUT_LEN: usize = 64;
const TOP_STRIP_LEN: usize = 5;

#[derive(Debug, Clone)]
struct Theme {
    primary_bg: Color,
    primary_fg: Color,
    accent: Color,
    accent_alt: Color,
    muted: Color,
    selection_bg: Color,
    selection_fg: Color,
    success: Color,
    warning: Color,
    danger: Color,
    on_accent: Color,
}

impl Theme {
    fn dark() -> Self {
        Self {
            primary_bg: Color::Black,
            primary_fg: Color::White,
            accent: Color::Cyan,
            accent_alt: Color::LightBlue,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            selection_fg: Color::White,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
            on_accent: Color::Black,
        }
    }

    /// Follows the terminal's own colours.
    fn light() -> Self {
        Self {
            primary_bg: Color::Reset,
            primary_fg: Color::Reset,
            accent: Color::Blue,
            accent_alt: Color::Magenta,
            muted: Color::Gray,
            selection_bg: Color::Gray,
            selection_fg: Color::Black,
            success: Color::Green,
            warning: Color::Rgb(184, 134, 11),
            danger: Color::Red,
            on_accent: Color::White,
        }
    }

    fn for_settings(settings: &Settings) -> Self {
        if settings.dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.primary_fg).bg(self.primary_bg)
    }

    fn probability_color(&self, probability: f64) -> Color {
        match ProbabilityTier::classify(probability) {
            ProbabilityTier::Elite => self.success,
            ProbabilityTier::Strong => self.accent,
            ProbabilityTier::Moderate => self.warning,
            ProbabilityTier::LongShot => self.danger,
        }
    }

    fn war_color(&self, war: f64) -> Color {
        match WarTier::classify(war) {
            WarTier::Star => self.success,
            WarTier::Regular => self.accent,
            WarTier::Contributor => self.warning,
            WarTier::Fringe => self.muted,
        }
    }
}

/// Single-line text editor for a setting value.
#[derive(Debug, Clone)]
struct EditPrompt {
    key: SettingKey,
    input: String,
    cursor: usize,
}

impl EditPrompt {
    fn new(key: SettingKey, current: String) -> Self {
        let cursor = current.chars().count();
        Self {
            key,
            input: current,
            cursor,
        }
    }

    fn len(&self) -> usize {
        self.input.chars().count()
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.input.len())
    }

    fn move_cursor(&mut self, delta: isize) {
        let next = (self.cursor as isize + delta).clamp(0, self.len() as isize);
        self.cursor = next as usize;
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.len();
    }

    fn insert(&mut self, ch: char) {
        if self.len() >= MAX_INPUT_LEN || ch.is_control() {
            return;
        }
        let idx = self.byte_index();
        self.input.insert(idx, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index();
            self.input.remove(idx);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.len() {
            let idx = self.byte_index();
            self.input.remove(idx);
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
    RefreshFinished(RefreshReport),
    RosterLoaded(Result<Vec<Player>>),
}

/// Terminal front-end over a shared prospect engine.
pub struct CurveApp {
    engine: SharedEngine,
    config: AppConfig,
    service: StatsService,
    settings: Settings,
    settings_store: SettingsStore,
    state: UiState,
    theme: Theme,
    event_tx: Option<mpsc::Sender<AppEvent>>,
    // Set while a refresh or reload owns the engine.
    mutation_pending: bool,
    edit_prompt: Option<EditPrompt>,
}

impl CurveApp {
    pub fn new(
        engine: SharedEngine,
        config: AppConfig,
        service: StatsService,
        settings: Settings,
        settings_store: SettingsStore,
    ) -> Self {
        let theme = Theme::for_settings(&settings);
        Self {
            engine,
            config,
            service,
            settings,
            settings_store,
            state: UiState::default(),
            theme,
            event_tx: None,
            mutation_pending: false,
            edit_prompt: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.load_initial_roster();

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());
        self.event_tx = Some(event_tx);

        let outcome = self.event_loop(&mut terminal, &mut event_rx).await;

        restore_terminal(&mut terminal)?;
        self.event_tx = None;
        outcome
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        event_rx: &mut mpsc::Receiver<AppEvent>,
    ) -> Result<()> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }
            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) || self.state.should_quit {
                break;
            }
        }
        Ok(())
    }

    fn load_initial_roster(&mut self) {
        match source::load_players(&self.config) {
            Ok(players) => {
                let count = players.len();
                self.engine.load(players);
                self.state.set_status(format!(
                    "Loaded {count} prospects from {} roster",
                    self.config.data_source
                ));
            }
            Err(err) => {
                error!(?err, "Initial roster load failed");
                self.state
                    .set_status(format!("Failed to load roster: {err:#}"));
            }
        }
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                let result = if self.edit_prompt.is_some() {
                    match event {
                        Event::Key(key) => self.handle_prompt_key(key),
                        _ => Ok(()),
                    }
                } else {
                    self.handle_input(event)
                };
                if let Err(err) = result {
                    self.state.set_status(format!("Error: {err:#}"));
                }
                true
            }
            Some(AppEvent::Tick) => {
                self.handle_tick();
                true
            }
            Some(AppEvent::RefreshFinished(report)) => {
                self.mutation_pending = false;
                self.state.set_status(refresh_message(&report));
                true
            }
            Some(AppEvent::RosterLoaded(result)) => {
                self.mutation_pending = false;
                match result {
                    Ok(players) => {
                        let count = players.len();
                        self.engine.load(players);
                        self.state.prospects.reset();
                        info!(count, "Roster reloaded");
                        self.state.set_status(format!("Reloaded {count} prospects"));
                    }
                    Err(err) => {
                        error!(?err, "Roster reload failed");
                        self.state.set_status(format!(
                            "Reload failed, keeping previous roster: {err:#}"
                        ));
                    }
                }
                true
            }
            None => false,
        }
    }

    fn handle_tick(&mut self) {
        if self.state.mode == Mode::Search {
            self.state
                .set_status(format!("Search: {}", self.state.search));
        }
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => match self.state.mode {
                Mode::Search => self.handle_search_key(key),
                Mode::Browse => self.handle_browse_key(key),
            },
            Event::Resize(_, _) => Ok(()),
            Event::Mouse(_) => Ok(()),
            Event::FocusGained | Event::FocusLost | Event::Paste(_) => Ok(()),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.state.mode = Mode::Browse;
                self.state.search.clear();
                self.state.prospects.reset();
                self.state.set_status("Search cleared");
            }
            KeyCode::Enter => {
                self.state.mode = Mode::Browse;
                let message = if self.state.search.is_empty() {
                    "Showing all prospects".to_string()
                } else {
                    format!("Search applied: {}", self.state.search)
                };
                self.state.set_status(message);
            }
            KeyCode::Backspace => {
                self.state.search.pop();
                self.state.prospects.reset();
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.state.search.push(c);
                    self.state.prospects.reset();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.state.should_quit = true,
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.start_roster_reload()
            }
            KeyCode::Char('r') if key.modifiers.is_empty() => self.start_refresh(),
            KeyCode::Tab => self.state.switch_tab(self.state.tab.next()),
            KeyCode::BackTab => self.state.switch_tab(self.state.tab.previous()),
            KeyCode::Char(ch) if key.modifiers.is_empty() && Tab::from_digit(ch).is_some() => {
                if let Some(tab) = Tab::from_digit(ch) {
                    self.state.switch_tab(tab);
                }
            }
            _ => match self.state.tab {
                Tab::Prospects => self.handle_prospects_key(key)?,
                Tab::Teams => {
                    let len = catalog::DIVISIONS.len();
                    navigate(&mut self.state.divisions, key, len);
                }
                Tab::Analytics => self.handle_analytics_key(key),
                Tab::Settings => self.handle_settings_key(key)?,
            },
        }
        Ok(())
    }

    fn handle_prospects_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('/') => {
                self.state.mode = Mode::Search;
                self.state.set_status("Type to search by name");
            }
            KeyCode::Char('s') if key.modifiers.is_empty() => {
                self.state.sort = self.state.sort.next();
                self.state.prospects.reset();
                self.state
                    .set_status(format!("Sorted by {}", self.state.sort.label()));
            }
            KeyCode::Char('e') if key.modifiers.is_empty() => self.export_roster()?,
            _ => {
                let len = self.visible_players().len();
                navigate(&mut self.state.prospects, key, len);
            }
        }
        Ok(())
    }

    fn handle_analytics_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('t') if key.modifiers.is_empty() => {
                self.state.time_frame = self.state.time_frame.next();
                self.state
                    .set_status(format!("Time frame: {}", self.state.time_frame.label()));
            }
            KeyCode::Char('c') if key.modifiers.is_empty() => {
                self.state.chart = self.state.chart.next();
                self.state
                    .set_status(format!("Chart: {}", self.state.chart.label()));
            }
            _ => {}
        }
    }

    fn handle_settings_key(&mut self, key: KeyEvent) -> Result<()> {
        let selected = SettingKey::ALL.get(self.state.settings.cursor).copied();
        match (key.code, selected) {
            (KeyCode::Enter, Some(setting)) => self.activate_setting(setting)?,
            (KeyCode::Char(' '), Some(SettingKey::DarkMode)) => {
                self.activate_setting(SettingKey::DarkMode)?
            }
            (KeyCode::Left | KeyCode::Char('-'), Some(SettingKey::FontScale)) => {
                self.settings.step_font_scale(-1);
                self.persist_setting(SettingKey::FontScale)?;
            }
            (KeyCode::Right | KeyCode::Char('+'), Some(SettingKey::FontScale)) => {
                self.settings.step_font_scale(1);
                self.persist_setting(SettingKey::FontScale)?;
            }
            _ => navigate(&mut self.state.settings, key, SettingKey::ALL.len()),
        }
        Ok(())
    }

    fn activate_setting(&mut self, setting: SettingKey) -> Result<()> {
        match setting {
            SettingKey::DarkMode => {
                self.settings.toggle_dark_mode();
                self.persist_setting(setting)
            }
            SettingKey::FontScale => {
                if self.settings.font_scale >= FONT_SCALE_MAX - f64::EPSILON {
                    self.settings
                        .set(SettingKey::FontScale, &FONT_SCALE_MIN.to_string())?;
                } else {
                    self.settings.step_font_scale(1);
                }
                self.persist_setting(setting)
            }
            SettingKey::UserName | SettingKey::UserEmail => {
                self.edit_prompt = Some(EditPrompt::new(setting, self.settings.get(setting)));
                Ok(())
            }
        }
    }

    fn persist_setting(&mut self, setting: SettingKey) -> Result<()> {
        self.theme = Theme::for_settings(&self.settings);
        self.settings_store
            .save(&self.settings)
            .context("setting applied but not saved")?;
        self.state.set_status(format!(
            "{} set to {}",
            setting.label(),
            self.settings.display_value(setting)
        ));
        Ok(())
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Result<()> {
        let mut submit: Option<(SettingKey, String)> = None;
        let mut cancel = false;
        if let Some(prompt) = self.edit_prompt.as_mut() {
            match key.code {
                KeyCode::Esc => cancel = true,
                KeyCode::Enter => submit = Some((prompt.key, prompt.input.clone())),
                KeyCode::Left => prompt.move_cursor(-1),
                KeyCode::Right => prompt.move_cursor(1),
                KeyCode::Home => prompt.move_home(),
                KeyCode::End => prompt.move_end(),
                KeyCode::Backspace => prompt.backspace(),
                KeyCode::Delete => prompt.delete(),
                KeyCode::Char(ch) => {
                    if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                        prompt.insert(ch);
                    }
                }
                _ => {}
            }
        }

        if cancel {
            self.edit_prompt = None;
            self.state.set_status("Edit cancelled");
            return Ok(());
        }

        if let Some((setting, value)) = submit {
            // Invalid input keeps the prompt open for correction.
            self.settings.set(setting, &value)?;
            self.edit_prompt = None;
            self.persist_setting(setting)?;
        }
        Ok(())
    }

    fn start_refresh(&mut self) {
        if self.mutation_pending {
            self.state.set_status("A roster update is already running");
            return;
        }
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        self.mutation_pending = true;
        self.state.set_status("Refreshing projections...");

        let engine = self.engine.clone();
        let service = self.service.clone();
        spawn(async move {
            let report = engine
                .refresh_projections(move |player| {
                    let service = service.clone();
                    async move { service.fetch_prospect_prediction(&player).await }
                })
                .await;
            if tx.send(AppEvent::RefreshFinished(report)).await.is_err() {
                warn!("UI closed before projection refresh finished");
            }
        });
    }

    fn start_roster_reload(&mut self) {
        if self.mutation_pending {
            self.state.set_status("A roster update is already running");
            return;
        }
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        self.mutation_pending = true;
        self.state.set_status("Reloading roster...");

        let config = self.config.clone();
        spawn(async move {
            let result = task::spawn_blocking(move || source::load_players(&config))
                .await
                .context("roster loader stopped unexpectedly")
                .and_then(|loaded| loaded);
            if tx.send(AppEvent::RosterLoaded(result)).await.is_err() {
                warn!("UI closed before roster reload finished");
            }
        });
    }

    fn export_roster(&mut self) -> Result<()> {
        let players = self.engine.snapshot();
        let count = players.len();
        let snapshot = RosterSnapshot::new(players, Some(self.config.data_source.to_string()));
        snapshot.persist(&self.config.roster_path)?;
        info!(count, path = %self.config.roster_path.display(), "Roster exported");
        self.state.set_status(format!(
            "Saved {count} prospects to {}",
            self.config.roster_path.display()
        ));
        Ok(())
    }

    /// Search results in the current sort order.
    fn visible_players(&self) -> Vec<Player> {
        let matches = self.engine.read(|engine| engine.search(&self.state.search));
        engine::sort_by(&matches, self.state.sort)
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        frame.render_widget(Block::default().style(self.theme.base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(area);

        self.render_tabs(frame, chunks[0]);
        match self.state.tab {
            Tab::Prospects => self.draw_prospects(frame, chunks[1]),
            Tab::Teams => self.draw_teams(frame, chunks[1]),
            Tab::Analytics => self.draw_analytics(frame, chunks[1]),
            Tab::Settings => self.draw_settings(frame, chunks[1]),
        }
        self.render_status(frame, chunks[2]);

        if let Some(prompt) = &self.edit_prompt {
            self.render_edit_prompt(frame, prompt);
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<String> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(idx, tab)| format!("{} {}", idx + 1, tab.title()))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.state.tab.index())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Career Curve · {}", self.settings.user_name)),
            )
            .style(Style::default().fg(self.theme.muted))
            .highlight_style(
                Style::default()
                    .fg(self.theme.on_accent)
                    .bg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn name_style(&self) -> Style {
        let style = Style::default().fg(self.theme.primary_fg);
        if self.settings.font_scale >= 1.2 {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    fn draw_prospects(&mut self, frame: &mut Frame, area: Rect) {
        let panes = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(panes[1]);

        let players = self.visible_players();
        self.render_top_strip(frame, panes[0], top_strip(&players));
        let rows = ProspectRows::build(&players);
        let list = &mut self.state.prospects;
        list.height = body[0].height.saturating_sub(2) as usize;
        list.clamp(rows.player_count());
        let selected_row = rows.row_of(list.cursor);
        if let Some(row) = selected_row {
            list.reveal(row, rows.rows.len());
        }
        let offset = list.offset;
        let end = (offset + list.height).min(rows.rows.len());

        let detailed = self.settings.font_scale >= 1.0;
        let items: Vec<ListItem> = rows.rows[offset..end]
            .iter()
            .map(|row| match row {
                Row::Header { kind, count } => ListItem::new(Line::from(Span::styled(
                    format!("{kind} ({count})"),
                    Style::default()
                        .fg(self.theme.accent_alt)
                        .add_modifier(Modifier::BOLD),
                ))),
                Row::Player(player) => {
                    let projection = player.projected_stats();
                    let mut spans = vec![
                        Span::styled(
                            format!("{:>4.0}% ", projection.career_probability * 100.0),
                            Style::default()
                                .fg(self.theme.probability_color(projection.career_probability)),
                        ),
                        Span::styled(player.full_name().to_string(), self.name_style()),
                    ];
                    if detailed {
                        spans.push(Span::styled(
                            format!(
                                " · {} · {}",
                                player.position().code,
                                player.current_team().name
                            ),
                            Style::default().fg(self.theme.muted),
                        ));
                    }
                    ListItem::new(Line::from(spans))
                }
            })
            .collect();

        let mut list_state = ListState::default();
        if let Some(row) = selected_row {
            list_state.select(Some(row.saturating_sub(offset)));
        }
        let title = format!(
            "Prospects ({}) · sort: {} · / search  s sort  r refresh  e export",
            rows.player_count(),
            self.state.sort.label()
        );
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(
                Style::default()
                    .bg(self.theme.selection_bg)
                    .fg(self.theme.selection_fg),
            );
        frame.render_stateful_widget(list, body[0], &mut list_state);

        let selected = rows.player(self.state.prospects.cursor).cloned();
        self.render_player_detail(frame, body[1], selected.as_ref());
    }

    fn render_top_strip(&self, frame: &mut Frame, area: Rect, leaders: &[Player]) {
        let mut spans = Vec::new();
        for (rank, player) in leaders.iter().enumerate() {
            let probability = player.projected_stats().career_probability;
            if rank > 0 {
                spans.push(Span::styled("  ·  ", Style::default().fg(self.theme.muted)));
            }
            spans.push(Span::styled(player.full_name().to_string(), self.name_style()));
            spans.push(Span::styled(
                format!(" {:.0}%", probability * 100.0),
                Style::default().fg(self.theme.probability_color(probability)),
            ));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans))
                .block(Block::default().borders(Borders::ALL).title("Top Prospects")),
            area,
        );
    }

    fn render_player_detail(&self, frame: &mut Frame, area: Rect, player: Option<&Player>) {
        let block = Block::default().borders(Borders::ALL).title("Prospect Details");
        let Some(player) = player else {
            let message = if self.state.search.is_empty() {
                "No prospects loaded".to_string()
            } else {
                format!("No prospects match '{}'", self.state.search)
            };
            frame.render_widget(Paragraph::new(message).block(block), area);
            return;
        };

        let team = player.current_team();
        let position = player.position();
        let projection = player.projected_stats();
        let muted = Style::default().fg(self.theme.muted);
        let label = |text: &str| Span::styled(text.to_string(), muted);

        let mut lines = vec![
            Line::from(Span::styled(
                player.full_name().to_string(),
                self.name_style().add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                label("Team      "),
                Span::raw(format!("{} ({})", team.name, team.division.name)),
            ]),
            Line::from(vec![
                label("Position  "),
                Span::raw(format!("{} ({}) · {}", position.name, position.code, position.kind)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Current Season",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        match player.stats() {
            PlayerStats::Batting(batting) => {
                lines.push(Line::from(format!(
                    "AVG {:.3}  OBP {:.3}  SLG {:.3}  OPS {:.3}",
                    batting.avg, batting.obp, batting.slg, batting.ops
                )));
                lines.push(Line::from(format!(
                    "HR {}  RBI {}  H {}  AB {}  G {}",
                    batting.hr, batting.rbi, batting.hits, batting.at_bats, batting.games
                )));
            }
            PlayerStats::Pitching(pitching) => {
                lines.push(Line::from(format!(
                    "ERA {:.2}  WHIP {:.2}  IP {:.1}",
                    pitching.era, pitching.whip, pitching.innings
                )));
                lines.push(Line::from(format!(
                    "W-L {}-{}  SV {}  SO {}  G {}  GS {}",
                    pitching.wins,
                    pitching.losses,
                    pitching.saves,
                    pitching.strikeouts,
                    pitching.games,
                    pitching.games_started
                )));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Projection",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(vec![
            label("Career probability  "),
            Span::styled(
                format!(
                    "{:.0}% ({})",
                    projection.career_probability * 100.0,
                    probability_tier_label(projection.career_probability)
                ),
                Style::default().fg(self.theme.probability_color(projection.career_probability)),
            ),
        ]));
        lines.push(Line::from(vec![
            label("Peak WAR            "),
            Span::styled(
                format!("{:.1} ({})", projection.peak_war, war_tier_label(projection.peak_war)),
                Style::default().fg(self.theme.war_color(projection.peak_war)),
            ),
        ]));
        lines.push(Line::from(vec![
            label("Projected debut     "),
            Span::raw(projection.projected_debut.clone()),
        ]));
        let similar = if projection.similar_players.is_empty() {
            "—".to_string()
        } else {
            projection.similar_players.join(", ")
        };
        lines.push(Line::from(vec![label("Similar players     "), Span::raw(similar)]));

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_teams(&mut self, frame: &mut Frame, area: Rect) {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(area);

        let divisions = catalog::division_names();
        let list = &mut self.state.divisions;
        list.height = body[0].height.saturating_sub(2) as usize;
        list.clamp(divisions.len());
        list.reveal(list.cursor, divisions.len());
        let cursor = list.cursor;

        let items: Vec<ListItem> = divisions
            .iter()
            .map(|name| {
                let count = self
                    .engine
                    .read(|engine| engine.division_prospect_count(name));
                ListItem::new(Line::from(vec![
                    Span::styled(name.to_string(), self.name_style()),
                    Span::styled(format!("  {count}"), Style::default().fg(self.theme.muted)),
                ]))
            })
            .collect();
        let mut list_state = ListState::default();
        if !divisions.is_empty() {
            list_state.select(Some(cursor));
        }
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Divisions"))
            .highlight_style(
                Style::default()
                    .bg(self.theme.selection_bg)
                    .fg(self.theme.selection_fg),
            );
        frame.render_stateful_widget(list, body[0], &mut list_state);

        let Some(division) = divisions.get(cursor).copied() else {
            return;
        };
        self.render_division(frame, body[1], division);
    }

    fn render_division(&self, frame: &mut Frame, area: Rect, division: &str) {
        let roster = catalog::division_roster(division);
        let panes = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(roster.len() as u16 + 2),
                Constraint::Min(3),
            ])
            .split(area);

        let team_lines: Vec<Line> = roster
            .iter()
            .map(|team_name| {
                let (count, club) = self.engine.read(|engine| {
                    let club = engine
                        .team_named(team_name)
                        .map(|team| format!("{} · {}", team.abbreviation, team.name));
                    (engine.team_prospect_count(team_name), club)
                });
                let mut spans = vec![
                    Span::styled(format!("{team_name:<14}"), self.name_style()),
                    Span::styled(
                        format!("{count:>2} prospects"),
                        Style::default().fg(if count > 0 {
                            self.theme.success
                        } else {
                            self.theme.muted
                        }),
                    ),
                ];
                if let Some(club) = club {
                    spans.push(Span::styled(
                        format!("   {club}"),
                        Style::default().fg(self.theme.muted),
                    ));
                }
                Line::from(spans)
            })
            .collect();
        frame.render_widget(
            Paragraph::new(team_lines)
                .block(Block::default().borders(Borders::ALL).title(division.to_string())),
            panes[0],
        );

        let members = engine::sort_by(
            &self.engine.read(|engine| engine.filter_by_division(division)),
            SortKey::Probability,
        );
        let items: Vec<ListItem> = if members.is_empty() {
            vec![ListItem::new(Span::styled(
                "No tracked prospects in this division",
                Style::default().fg(self.theme.muted),
            ))]
        } else {
            members
                .iter()
                .map(|player| {
                    let probability = player.projected_stats().career_probability;
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("{:>4.0}% ", probability * 100.0),
                            Style::default().fg(self.theme.probability_color(probability)),
                        ),
                        Span::raw(player.display_name()),
                    ]))
                })
                .collect()
        };
        frame.render_widget(
            List::new(items).block(Block::default().borders(Borders::ALL).title("Prospects")),
            panes[1],
        );
    }

    fn draw_analytics(&self, frame: &mut Frame, area: Rect) {
        let players = self.engine.snapshot();
        let today = Local::now().date_naive();
        let (framed, summary) = framed_summary(&players, self.state.time_frame, today);

        let panes = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(5),
            ])
            .split(area);

        let top = summary
            .top_prospect
            .as_ref()
            .map(|top| format!("{} ({:.1} WAR)", top.name, top.peak_war))
            .unwrap_or_else(|| "—".to_string());
        let summary_lines = vec![
            Line::from(vec![
                Span::styled("Avg probability ", Style::default().fg(self.theme.muted)),
                Span::styled(
                    format!("{:.1}%", summary.average_career_probability * 100.0),
                    Style::default()
                        .fg(self.theme.probability_color(summary.average_career_probability)),
                ),
                Span::styled("   Next-year debuts ", Style::default().fg(self.theme.muted)),
                Span::raw(summary.next_year_debut_count.to_string()),
                Span::styled("   Impact players ", Style::default().fg(self.theme.muted)),
                Span::raw(summary.impact_player_count.to_string()),
            ]),
            Line::from(vec![
                Span::styled("Top prospect ", Style::default().fg(self.theme.muted)),
                Span::styled(top, self.name_style()),
            ]),
        ];
        frame.render_widget(
            Paragraph::new(summary_lines)
                .block(Block::default().borders(Borders::ALL).title("Summary")),
            panes[0],
        );

        let mut frame_spans = vec![Span::raw("Time frame: ")];
        for option in TimeFrame::ALL {
            let style = if option == self.state.time_frame {
                Style::default()
                    .fg(self.theme.on_accent)
                    .bg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted)
            };
            frame_spans.push(Span::styled(format!(" {} ", option.label()), style));
            frame_spans.push(Span::raw(" "));
        }
        frame_spans.push(Span::styled(
            format!("  {} debuts in window · t time frame  c chart", framed.len()),
            Style::default().fg(self.theme.muted),
        ));
        frame.render_widget(
            Paragraph::new(Line::from(frame_spans)).block(Block::default().borders(Borders::ALL)),
            panes[1],
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.state.chart.label());
        if framed.is_empty() {
            let message = format!(
                "No projected debuts in the last {}",
                self.state.time_frame.label().to_lowercase()
            );
            frame.render_widget(
                Paragraph::new(message)
                    .alignment(Alignment::Center)
                    .block(block),
                panes[2],
            );
            return;
        }

        match self.state.chart {
            ChartKind::Probability => {
                let bars: Vec<Bar> =
                    analytics::probability_distribution(&framed, PROBABILITY_BUCKETS)
                        .iter()
                        .map(|bucket| {
                            let color = self.theme.probability_color(bucket.lower);
                            Bar::default()
                                .value(bucket.count as u64)
                                .label(Line::from(bucket.label()))
                                .style(Style::default().fg(color))
                                .value_style(Style::default().fg(self.theme.on_accent).bg(color))
                        })
                        .collect();
                self.render_bars(frame, panes[2], block, &bars);
            }
            ChartKind::Positions => {
                let bars: Vec<Bar> = analytics::position_distribution(&framed)
                    .into_iter()
                    .map(|(name, count)| {
                        Bar::default()
                            .value(count as u64)
                            .label(Line::from(name))
                            .style(Style::default().fg(self.theme.accent))
                            .value_style(
                                Style::default()
                                    .fg(self.theme.on_accent)
                                    .bg(self.theme.accent),
                            )
                    })
                    .collect();
                self.render_bars(frame, panes[2], block, &bars);
            }
            ChartKind::PeakWar => {
                let bars: Vec<Bar> = analytics::top_by_war(&framed, TOP_WAR_LIMIT)
                    .iter()
                    .map(|player| {
                        let war = player.projected_stats().peak_war;
                        let color = self.theme.war_color(war);
                        Bar::default()
                            .value((war.max(0.0) * 10.0).round() as u64)
                            .text_value(format!("{war:.1}"))
                            .label(Line::from(player.full_name().to_string()))
                            .style(Style::default().fg(color))
                            .value_style(Style::default().fg(self.theme.on_accent).bg(color))
                    })
                    .collect();
                self.render_bars(frame, panes[2], block, &bars);
            }
            ChartKind::DebutTimeline => {
                let items: Vec<ListItem> = analytics::debut_timeline(&framed)
                    .iter()
                    .map(|player| {
                        let projection = player.projected_stats();
                        ListItem::new(Line::from(vec![
                            Span::styled(
                                format!("{}  ", projection.projected_debut),
                                Style::default().fg(self.theme.accent_alt),
                            ),
                            Span::styled(player.full_name().to_string(), self.name_style()),
                            Span::styled(
                                format!(" · {}  ", player.current_team().name),
                                Style::default().fg(self.theme.muted),
                            ),
                            Span::styled(
                                format!("{:.0}%", projection.career_probability * 100.0),
                                Style::default().fg(
                                    self.theme.probability_color(projection.career_probability),
                                ),
                            ),
                        ]))
                    })
                    .collect();
                frame.render_widget(List::new(items).block(block), panes[2]);
            }
        }
    }

    fn render_bars(&self, frame: &mut Frame, area: Rect, block: Block, bars: &[Bar]) {
        let chart = BarChart::default()
            .block(block)
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .data(BarGroup::default().bars(bars));
        frame.render_widget(chart, area);
    }

    fn draw_settings(&mut self, frame: &mut Frame, area: Rect) {
        let panes = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(SettingKey::ALL.len() as u16 + 2),
                Constraint::Min(3),
            ])
            .split(area);

        let list = &mut self.state.settings;
        list.clamp(SettingKey::ALL.len());
        let mut list_state = ListState::default();
        list_state.select(Some(list.cursor));

        let items: Vec<ListItem> = SettingKey::ALL
            .iter()
            .map(|key| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<12}", key.label()), self.name_style()),
                    Span::styled(
                        self.settings.display_value(*key),
                        Style::default().fg(self.theme.accent),
                    ),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Settings"))
            .highlight_style(
                Style::default()
                    .bg(self.theme.selection_bg)
                    .fg(self.theme.selection_fg),
            );
        frame.render_stateful_widget(list, panes[0], &mut list_state);

        let help = vec![
            Line::from(vec![
                Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" toggle or edit  "),
                Span::styled("←/→", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" text size"),
            ]),
            Line::from(Span::styled(
                format!("Stored in {}", self.settings_store.path().display()),
                Style::default().fg(self.theme.muted),
            )),
            Line::from(Span::styled(
                format!(
                    "Roster source: {} · stats service: {}",
                    self.config.data_source,
                    self.service.base_url()
                ),
                Style::default().fg(self.theme.muted),
            )),
        ];
        frame.render_widget(
            Paragraph::new(help)
                .block(Block::default().borders(Borders::ALL).title("Help"))
                .wrap(Wrap { trim: true }),
            panes[1],
        );
    }

    fn render_edit_prompt(&self, frame: &mut Frame, prompt: &EditPrompt) {
        let frame_area = frame.size();
        let mut width = cmp::min(60_u16, frame_area.width.saturating_sub(4));
        width = cmp::max(width, 24_u16);
        let height = 6_u16.min(frame_area.height.saturating_sub(2)).max(5_u16);
        let area = centered_rect(width, height, frame_area);

        frame.render_widget(Clear, area);

        let input_line = Line::from(vec![
            Span::styled("> ", Style::default().fg(self.theme.accent)),
            Span::raw(prompt.input.clone()),
        ]);
        let helper = Line::from(vec![
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" save  "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]);

        let paragraph = Paragraph::new(vec![
            Line::from(format!("New {}", prompt.key.label().to_lowercase())),
            input_line,
            Line::from(""),
            helper,
        ])
        .style(self.theme.base())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Edit {}", prompt.key.label())),
        )
        .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, area);

        let cursor_x =
            (area.x + 3 + prompt.cursor as u16).min(area.x + area.width.saturating_sub(2));
        let cursor_y = area.y + 2;
        frame.set_cursor(cursor_x, cursor_y);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let primary = if self.state.mode == Mode::Search {
            format!("Search: {}", self.state.search)
        } else {
            self.state.status.clone()
        };
        let total = self.engine.read(|engine| engine.len());
        let mut secondary = format!(
            "{total} prospects · source: {} · 1-4 tabs  r refresh  Ctrl-r reload  q quit",
            self.config.data_source
        );
        if self.mutation_pending {
            secondary.push_str(" · updating…");
        }
        let paragraph = Paragraph::new(vec![
            Line::from(primary),
            Line::from(Span::styled(secondary, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

/// Leading players of an already sorted list.
fn top_strip(players: &[Player]) -> &[Player] {
    &players[..players.len().min(TOP_STRIP_LEN)]
}

/// Players debuting inside `time_frame` and the summary computed over them.
fn framed_summary(
    players: &[Player],
    time_frame: TimeFrame,
    today: NaiveDate,
) -> (Vec<Player>, Summary) {
    let framed = analytics::filter_by_timeframe(players, time_frame, today);
    let summary = engine::summary_statistics(&framed);
    (framed, summary)
}

/// Shared list movement for j/k, arrows, paging and jumps.
fn navigate(list: &mut ListCursor, key: KeyEvent, len: usize) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => list.move_by(1, len),
        KeyCode::Char('k') | KeyCode::Up => list.move_by(-1, len),
        KeyCode::Char('g') | KeyCode::Home => list.move_to(0, len),
        KeyCode::Char('G') | KeyCode::End => list.move_to(len.saturating_sub(1), len),
        KeyCode::PageDown => list.page(1, len),
        KeyCode::PageUp => list.page(-1, len),
        _ => {}
    }
}

fn refresh_message(report: &RefreshReport) -> String {
    if report.is_clean() {
        return format!("Refreshed {} projections", report.updated);
    }
    let mut message = format!(
        "Refreshed {}/{} projections; {} failed",
        report.updated,
        report.attempted,
        report.failures.len()
    );
    if let Some(first) = report.failures.first() {
        message.push_str(&format!(" ({}: {})", first.player_name, first.reason));
    }
    message
}

fn probability_tier_label(probability: f64) -> &'static str {
    match ProbabilityTier::classify(probability) {
        ProbabilityTier::Elite => "elite",
        ProbabilityTier::Strong => "strong",
        ProbabilityTier::Moderate => "moderate",
        ProbabilityTier::LongShot => "long shot",
    }
}

fn war_tier_label(war: f64) -> &'static str {
    match WarTier::classify(war) {
        WarTier::Star => "star",
        WarTier::Regular => "regular",
        WarTier::Contributor => "contributor",
        WarTier::Fringe => "fringe",
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve_core::{engine::RefreshFailure, models::ProjectedStats, source::mock};

    fn debuting(player: &Player, probability: f64, debut: &str) -> Player {
        player.with_projection(ProjectedStats::new(probability, 3.5, Vec::new(), debut))
    }

    #[test]
    fn summary_follows_time_frame() {
        let roster = mock::top_prospects().unwrap();
        let players = vec![
            debuting(&roster[0], 0.9, "2025"),
            debuting(&roster[1], 0.1, "2027"),
        ];
        let today = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();

        let (framed, summary) = framed_summary(&players, TimeFrame::OneYear, today);
        assert_eq!(framed.len(), 1);
        assert!((summary.average_career_probability - 0.9).abs() < 1e-9);
        assert_eq!(summary.impact_player_count, 1);

        let (framed, summary) = framed_summary(&players, TimeFrame::SixMonths, today);
        assert!(framed.is_empty());
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn top_strip_takes_first_five() {
        let players = engine::sort_by(&mock::top_prospects().unwrap(), SortKey::Probability);
        let leaders = top_strip(&players);
        assert_eq!(leaders.len(), TOP_STRIP_LEN);
        assert_eq!(leaders, &players[..TOP_STRIP_LEN]);
        assert!(top_strip(&[]).is_empty());
    }

    #[test]
    fn prompt_edits_multibyte_text() {
        let mut prompt = EditPrompt::new(SettingKey::UserName, "Acuña".to_string());
        assert_eq!(prompt.cursor, 5);
        prompt.backspace();
        prompt.insert('a');
        assert_eq!(prompt.input, "Acuña");
        prompt.move_home();
        prompt.delete();
        prompt.insert('a');
        assert_eq!(prompt.input, "acuña");
        prompt.move_cursor(-3);
        assert_eq!(prompt.cursor, 0);
        prompt.move_end();
        assert_eq!(prompt.cursor, 5);
    }

    #[test]
    fn prompt_rejects_control_and_overflow() {
        let mut prompt = EditPrompt::new(SettingKey::UserEmail, String::new());
        prompt.insert('\n');
        assert!(prompt.input.is_empty());
        for _ in 0..(MAX_INPUT_LEN + 5) {
            prompt.insert('x');
        }
        assert_eq!(prompt.len(), MAX_INPUT_LEN);
    }

    #[test]
    fn refresh_message_names_first_failure() {
        let mut report = RefreshReport {
            attempted: 5,
            updated: 4,
            failures: Vec::new(),
        };
        assert_eq!(refresh_message(&report), "Refreshed 4 projections");
        report.failures.push(RefreshFailure {
            player_id: 3,
            player_name: "C".to_string(),
            reason: "model offline".to_string(),
        });
        assert_eq!(
            refresh_message(&report),
            "Refreshed 4/5 projections; 1 failed (C: model offline)"
        );
    }

    #[test]
    fn theme_tracks_dark_mode() {
        let mut settings = Settings::default();
        assert_eq!(Theme::for_settings(&settings).primary_bg, Color::Reset);
        settings.toggle_dark_mode();
        assert_eq!(Theme::for_settings(&settings).primary_bg, Color::Black);
    }

    #[test]
    fn navigation_keys_move_cursor() {
        let mut list = ListCursor {
            height: 2,
            ..ListCursor::default()
        };
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        navigate(&mut list, key(KeyCode::Char('j')), 5);
        navigate(&mut list, key(KeyCode::Down), 5);
        assert_eq!(list.cursor, 2);
        navigate(&mut list, key(KeyCode::Char('G')), 5);
        assert_eq!(list.cursor, 4);
        navigate(&mut list, key(KeyCode::PageUp), 5);
        assert_eq!(list.cursor, 2);
        navigate(&mut list, key(KeyCode::Home), 5);
        assert_eq!(list.cursor, 0);
    }
}
