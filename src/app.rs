use crate::catalog::{GameKind, GAMES};
use crate::config::ConfigStore;
use crate::position::{GuessError, PositionGame, PositionPhase};
use crate::results_log::{ResultsLog, SessionSummary};
use crate::sum::{SumGame, SumPhase};
use crate::timer::Moment;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::layout::Rect;

/// Which top-level screen has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Landing,
    Game(GameKind),
}

/// Whether the event loop keeps going after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub screen: Screen,
    pub landing_selected: usize,
    pub sum: SumGame,
    pub position: PositionGame,
    /// One-line message for the status bar, cleared by the next key.
    pub notice: Option<String>,
    results_log: Option<ResultsLog>,
    // where the position bar was last drawn, for mouse hit-testing
    pub(crate) bar_area: Option<Rect>,
}

impl App {
    /// Builds both games over `store`. A seed makes every session repeatable.
    pub fn new<S>(store: S, results_log: Option<ResultsLog>, seed: Option<u64>) -> Self
    where
        S: ConfigStore + Clone + 'static,
    {
        let (sum, position) = match seed {
            Some(seed) => (
                SumGame::with_rng(Box::new(store.clone()), StdRng::seed_from_u64(seed)),
                PositionGame::with_rng(
                    Box::new(store),
                    StdRng::seed_from_u64(seed.wrapping_add(1)),
                ),
            ),
            None => (
                SumGame::new(Box::new(store.clone())),
                PositionGame::new(Box::new(store)),
            ),
        };
        Self {
            screen: Screen::Landing,
            landing_selected: 0,
            sum,
            position,
            notice: None,
            results_log,
            bar_area: None,
        }
    }

    pub fn open(&mut self, kind: GameKind) {
        self.screen = Screen::Game(kind);
        if let Some(i) = GAMES.iter().position(|g| g.kind == kind) {
            self.landing_selected = i;
        }
        self.notice = None;
    }

    pub fn bar_area(&self) -> Option<Rect> {
        self.bar_area
    }

    /// Advances timers and files any finished session in the results log.
    pub fn on_tick(&mut self, now: Moment) {
        self.sum.tick(now);
        self.position.tick(now);
        self.flush_finished();
    }

    fn flush_finished(&mut self) {
        let finished: Vec<SessionSummary> =
            [self.sum.take_finished(), self.position.take_finished()]
                .into_iter()
                .flatten()
                .collect();
        for summary in finished {
            info!(
                "{} finished: {}/{} in {:.1}s",
                summary.game, summary.score, summary.max_score, summary.elapsed_secs
            );
            if let Some(log) = &self.results_log {
                if let Err(e) = log.append(&summary) {
                    warn!("could not write results log {}: {e}", log.path().display());
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Moment) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }
        self.notice = None;

        let flow = match self.screen {
            Screen::Landing => self.landing_key(key),
            Screen::Game(GameKind::SumMemory) => {
                self.sum_key(key, now);
                Flow::Continue
            }
            Screen::Game(GameKind::PositionNumber) => {
                self.position_key(key, now);
                Flow::Continue
            }
        };
        // answers and guesses can finish a session without a tick
        self.flush_finished();
        flow
    }

    fn landing_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.landing_selected = self
                    .landing_selected
                    .checked_sub(1)
                    .unwrap_or(GAMES.len() - 1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.landing_selected = (self.landing_selected + 1) % GAMES.len();
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.open(GAMES[self.landing_selected].kind),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if let Some(game) = GAMES.get(idx) {
                    self.open(game.kind);
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            _ => {}
        }
        Flow::Continue
    }

    fn sum_key(&mut self, key: KeyEvent, now: Moment) {
        match self.sum.phase() {
            SumPhase::Settings { .. } => {
                if let Err(e) = self.sum_settings_key(key, now) {
                    self.notice = Some(e);
                }
            }
            SumPhase::Start => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.sum.start(now);
                }
                KeyCode::Tab | KeyCode::Char('s') => self.sum.open_settings(now),
                KeyCode::Esc | KeyCode::Char('q') => self.screen = Screen::Landing,
                _ => {}
            },
            SumPhase::Countdown { .. } | SumPhase::Playing { .. } => match key.code {
                KeyCode::Tab => self.sum.open_settings(now),
                KeyCode::Esc => self.sum.restart(),
                _ => {}
            },
            SumPhase::Input { .. } => match key.code {
                KeyCode::Enter => {
                    // the error is kept on the input phase for display
                    let _ = self.sum.submit_draft(now);
                }
                KeyCode::Backspace => self.sum.pop_char(),
                KeyCode::Tab => self.sum.open_settings(now),
                KeyCode::Esc => self.sum.restart(),
                KeyCode::Char(c) => self.sum.push_char(c),
                _ => {}
            },
            SumPhase::Result { .. } => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('p') => {
                    self.sum.start(now);
                }
                KeyCode::Tab | KeyCode::Char('s') => self.sum.open_settings(now),
                KeyCode::Esc | KeyCode::Char('q') => self.sum.restart(),
                _ => {}
            },
        }
    }

    fn sum_settings_key(&mut self, key: KeyEvent, now: Moment) -> Result<(), String> {
        match key.code {
            KeyCode::Enter => {
                // validation errors land on the editor itself
                let _ = self.sum.save_draft(now);
            }
            KeyCode::Esc => self.sum.cancel_settings(now),
            KeyCode::Char('r') => self.sum.reset_settings(now).map_err(|e| e.to_string())?,
            _ => {
                if let Some(editor) = self.sum.settings_mut() {
                    match key.code {
                        KeyCode::Up | KeyCode::Char('k') => editor.select_prev(),
                        KeyCode::Down | KeyCode::Char('j') => editor.select_next(),
                        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => {
                            editor.decrease()
                        }
                        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') => {
                            editor.increase()
                        }
                        KeyCode::Char('d') => editor.load_defaults(),
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }

    fn position_key(&mut self, key: KeyEvent, now: Moment) {
        match self.position.phase() {
            PositionPhase::Settings { .. } => {
                if let Err(e) = self.position_settings_key(key, now) {
                    self.notice = Some(e);
                }
            }
            PositionPhase::Start => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.position.start(now);
                }
                KeyCode::Tab | KeyCode::Char('s') => self.position.open_settings(now),
                KeyCode::Esc | KeyCode::Char('q') => self.screen = Screen::Landing,
                _ => {}
            },
            PositionPhase::Playing { .. } => {
                let coarse = key.modifiers.contains(KeyModifiers::SHIFT);
                let result = match key.code {
                    KeyCode::Left | KeyCode::Char('h') => {
                        self.nudge_marker(if coarse { -10 } else { -1 }, now)
                    }
                    KeyCode::Right | KeyCode::Char('l') => {
                        self.nudge_marker(if coarse { 10 } else { 1 }, now)
                    }
                    KeyCode::Char('H') => self.nudge_marker(-10, now),
                    KeyCode::Char('L') => self.nudge_marker(10, now),
                    KeyCode::Home => self.position.select_position(0.0, now),
                    KeyCode::End => self.position.select_position(100.0, now),
                    KeyCode::Enter | KeyCode::Char(' ') => self.position.submit_guess(now),
                    KeyCode::Tab => {
                        self.position.open_settings(now);
                        Ok(())
                    }
                    KeyCode::Esc | KeyCode::Char('q') => {
                        self.position.quit(now);
                        Ok(())
                    }
                    _ => Ok(()),
                };
                if let Err(e) = result {
                    self.notice = Some(e.to_string());
                }
            }
            PositionPhase::Result { .. } => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('p') => {
                    self.position.start(now);
                }
                KeyCode::Tab | KeyCode::Char('s') => self.position.open_settings(now),
                KeyCode::Esc | KeyCode::Char('q') => self.position.restart(),
                _ => {}
            },
        }
    }

    fn position_settings_key(&mut self, key: KeyEvent, now: Moment) -> Result<(), String> {
        match key.code {
            KeyCode::Enter => {
                let _ = self.position.save_draft(now);
            }
            KeyCode::Esc => self.position.cancel_settings(now),
            KeyCode::Char('r') => self
                .position
                .reset_settings(now)
                .map_err(|e| e.to_string())?,
            _ => {
                if let Some(editor) = self.position.settings_mut() {
                    match key.code {
                        KeyCode::Up | KeyCode::Char('k') => editor.select_prev(),
                        KeyCode::Down | KeyCode::Char('j') => editor.select_next(),
                        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => {
                            editor.decrease()
                        }
                        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') => {
                            editor.increase()
                        }
                        KeyCode::Char('d') => editor.load_defaults(),
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }

    // arrow keys step by the bar as drawn, which is narrower than
    // `bar_width` in a small terminal
    fn nudge_marker(&mut self, cells: i32, now: Moment) -> Result<(), GuessError> {
        let width = self
            .bar_area
            .map_or(self.position.session_config().bar_width, |bar| bar.width);
        self.position.nudge(cells, width, now)
    }

    /// Clicking or dragging on the range bar places the marker.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Moment) {
        if self.screen != Screen::Game(GameKind::PositionNumber) {
            return;
        }
        if !matches!(
            mouse.kind,
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left)
        ) {
            return;
        }
        let Some(bar) = self.bar_area else {
            return;
        };
        if let Some(position) = bar_position(bar, mouse.column, mouse.row) {
            // clicks during feedback are ignored
            let _ = self.position.select_position(position, now);
        }
    }
}

/// Percent of the bar under a terminal cell, measured at the cell centre.
pub fn bar_position(bar: Rect, column: u16, row: u16) -> Option<f64> {
    let inside = column >= bar.x
        && column < bar.x.saturating_add(bar.width)
        && row >= bar.y
        && row < bar.y.saturating_add(bar.height);
    if !inside || bar.width == 0 {
        return None;
    }
    let offset = f64::from(column - bar.x) + 0.5;
    Some(offset * 100.0 / f64::from(bar.width))
}

/// Bar cell that shows `position` percent.
pub fn bar_cell(position: f64, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let cell = (position * f64::from(width) / 100.0).floor() as u16;
    cell.min(width - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{save_config, MemoryConfigStore};
    use crate::position::PositionConfig;
    use crate::sum::SumConfig;
    use std::time::Duration;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(MemoryConfigStore::new(), None, Some(3))
    }

    #[test]
    fn landing_navigation_wraps_and_opens() {
        let mut app = app();
        let now = Moment::now();
        assert_eq!(app.handle_key(key(KeyCode::Up), now), Flow::Continue);
        assert_eq!(app.landing_selected, GAMES.len() - 1);
        app.handle_key(key(KeyCode::Down), now);
        assert_eq!(app.landing_selected, 0);
        app.handle_key(key(KeyCode::Enter), now);
        assert_eq!(app.screen, Screen::Game(GameKind::SumMemory));

        app.handle_key(key(KeyCode::Esc), now);
        assert_eq!(app.screen, Screen::Landing);
        app.handle_key(key(KeyCode::Char('2')), now);
        assert_eq!(app.screen, Screen::Game(GameKind::PositionNumber));
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        let now = Moment::now();
        assert_eq!(app.handle_key(key(KeyCode::Char('q')), now), Flow::Quit);

        app.open(GameKind::SumMemory);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ctrl_c, now), Flow::Quit);
    }

    #[test]
    fn typed_answer_reaches_the_result_log() {
        let dir = tempdir().unwrap();
        let store = MemoryConfigStore::new();
        save_config(
            &store,
            &SumConfig {
                number_count: 1,
                min_number: 4,
                max_number: 4,
                ..SumConfig::default()
            },
        )
        .unwrap();
        let log_path = dir.path().join("results.csv");
        let mut app = App::new(store, Some(ResultsLog::with_path(&log_path)), Some(1));
        app.open(GameKind::SumMemory);

        let t0 = Moment::now();
        app.handle_key(key(KeyCode::Enter), t0);
        // countdown, one number, one pause
        app.on_tick(t0.after(Duration::from_secs(30)));
        assert_eq!(app.sum.phase().name(), "Input");

        app.handle_key(key(KeyCode::Char('4')), t0);
        app.handle_key(key(KeyCode::Enter), t0);
        match app.sum.phase() {
            SumPhase::Result { result, .. } => assert!(result.is_correct),
            other => panic!("expected result, got {}", other.name()),
        }

        let mut reader = csv::Reader::from_path(&log_path).unwrap();
        assert_eq!(reader.records().count(), 1);
    }

    #[test]
    fn empty_answer_stays_on_input() {
        let store = MemoryConfigStore::new();
        save_config(
            &store,
            &SumConfig {
                number_count: 1,
                ..SumConfig::default()
            },
        )
        .unwrap();
        let mut app = App::new(store, None, Some(1));
        app.open(GameKind::SumMemory);
        let t0 = Moment::now();
        app.handle_key(key(KeyCode::Enter), t0);
        app.on_tick(t0.after(Duration::from_secs(30)));
        app.handle_key(key(KeyCode::Enter), t0);
        assert_matches::assert_matches!(app.sum.phase(), SumPhase::Input { error: Some(_), .. });
    }

    #[test]
    fn position_keys_move_and_submit() {
        let mut app = app();
        app.open(GameKind::PositionNumber);
        let t0 = Moment::now();
        app.handle_key(key(KeyCode::Enter), t0);

        app.handle_key(key(KeyCode::Enter), t0);
        assert_eq!(app.notice.as_deref(), Some("Pick a spot on the bar first"));

        app.handle_key(key(KeyCode::End), t0);
        app.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT), t0);
        match app.position.phase() {
            PositionPhase::Playing { round, .. } => {
                assert_eq!(round.guess.map(|g| g.position()), Some(80.0));
            }
            other => panic!("unexpected {}", other.name()),
        }
        app.handle_key(key(KeyCode::Enter), t0);
        assert_eq!(app.position.session().map(|s| s.rounds().len()), Some(1));
    }

    #[test]
    fn escape_during_position_round_ends_session() {
        let mut app = app();
        app.open(GameKind::PositionNumber);
        let t0 = Moment::now();
        app.handle_key(key(KeyCode::Enter), t0);
        app.handle_key(key(KeyCode::Esc), t0);
        assert_matches::assert_matches!(app.position.phase(), PositionPhase::Result { .. });
        app.handle_key(key(KeyCode::Esc), t0);
        assert_eq!(app.position.phase(), &PositionPhase::Start);
        app.handle_key(key(KeyCode::Esc), t0);
        assert_eq!(app.screen, Screen::Landing);
    }

    #[test]
    fn settings_keys_edit_and_save() {
        let store = MemoryConfigStore::new();
        let mut app = App::new(store.clone(), None, None);
        app.open(GameKind::PositionNumber);
        let t0 = Moment::now();
        app.handle_key(key(KeyCode::Char('s')), t0);
        assert_eq!(app.position.phase().name(), "Settings");
        app.handle_key(key(KeyCode::Down), t0);
        app.handle_key(key(KeyCode::Down), t0);
        app.handle_key(key(KeyCode::Right), t0);
        app.handle_key(key(KeyCode::Enter), t0);
        assert_eq!(app.position.phase(), &PositionPhase::Start);
        assert_eq!(app.position.config().round_count, 11);

        let saved: PositionConfig = crate::config::load_config(&store);
        assert_eq!(saved.round_count, 11);
    }

    #[test]
    fn arrow_keys_step_by_drawn_bar_width() {
        let mut app = app();
        app.open(GameKind::PositionNumber);
        let t0 = Moment::now();
        app.handle_key(key(KeyCode::Enter), t0);
        // configured at 50 cells but squeezed to 20 by the terminal
        assert_eq!(app.position.session_config().bar_width, 50);
        app.bar_area = Some(Rect::new(0, 5, 20, 1));

        app.handle_key(key(KeyCode::Right), t0);
        match app.position.phase() {
            PositionPhase::Playing { round, .. } => {
                assert_eq!(round.guess.map(|g| g.position()), Some(55.0));
            }
            other => panic!("unexpected {}", other.name()),
        }
        // one press moves the marker one drawn cell
        assert_eq!(bar_cell(50.0, 20), 10);
        assert_eq!(bar_cell(55.0, 20), 11);
    }

    #[test]
    fn mouse_click_places_marker() {
        let mut app = app();
        app.open(GameKind::PositionNumber);
        let t0 = Moment::now();
        app.handle_key(key(KeyCode::Enter), t0);
        app.bar_area = Some(Rect::new(10, 5, 50, 1));

        let click = |column, row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        app.handle_mouse(click(2, 5), t0);
        match app.position.phase() {
            PositionPhase::Playing { round, .. } => assert!(round.guess.is_none()),
            other => panic!("unexpected {}", other.name()),
        }
        app.handle_mouse(click(35, 5), t0);
        match app.position.phase() {
            PositionPhase::Playing { round, .. } => {
                assert_eq!(round.guess.map(|g| g.position()), Some(51.0));
            }
            other => panic!("unexpected {}", other.name()),
        }
    }

    #[test]
    fn bar_mapping_round_trips_cells() {
        let bar = Rect::new(3, 0, 50, 1);
        for cell in 0..50u16 {
            let pos = bar_position(bar, bar.x + cell, 0).unwrap();
            assert_eq!(bar_cell(pos, bar.width), cell);
        }
        assert_eq!(bar_cell(100.0, 50), 49);
        assert_eq!(bar_position(bar, 53, 0), None);
    }
}
