use super::evaluator::{score_guess, GuessError, PositionGuess, Rating, Round, RoundResult};
use super::session::PositionSession;
use super::PositionConfig;
use crate::catalog::GameKind;
use crate::config::{load_config, reset_config, save_config, ConfigError, ConfigStore, GameConfig};
use crate::generator::generate_target;
use crate::results_log::SessionSummary;
use crate::settings::SettingsEditor;
use crate::timer::{Moment, Suspended, Timer};
use log::{debug, warn};
use rand::{rngs::StdRng, SeedableRng};
use std::mem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionTimerEvent {
    AdvanceRound,
}

/// Display copy of a scored round, shown until the next round starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub result: RoundResult,
    pub rating: Rating,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    pub round: Round,
    pub guess: Option<PositionGuess>,
    pub feedback: Option<Feedback>,
}

impl RoundState {
    fn new(round: Round) -> Self {
        Self {
            round,
            guess: None,
            feedback: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PositionPhase {
    Start,
    Settings {
        editor: SettingsEditor<PositionConfig>,
        previous: Box<PositionPhase>,
        suspended: Option<Suspended<PositionTimerEvent>>,
    },
    Playing {
        session: PositionSession,
        round: RoundState,
    },
    Result {
        session: PositionSession,
    },
}

impl PositionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            PositionPhase::Start => "Start",
            PositionPhase::Settings { .. } => "Settings",
            PositionPhase::Playing { .. } => "Playing",
            PositionPhase::Result { .. } => "Result",
        }
    }

    /// The session in play, looking through an open settings screen.
    pub fn session(&self) -> Option<&PositionSession> {
        match self {
            PositionPhase::Playing { session, .. } | PositionPhase::Result { session } => {
                Some(session)
            }
            PositionPhase::Settings { previous, .. } => previous.session(),
            PositionPhase::Start => None,
        }
    }
}

/// Position the Number screen sequencer and round loop.
pub struct PositionGame {
    config: PositionConfig,
    session_config: PositionConfig,
    phase: PositionPhase,
    timer: Timer<PositionTimerEvent>,
    rng: StdRng,
    store: Box<dyn ConfigStore>,
    finished: Option<SessionSummary>,
}

impl PositionGame {
    pub fn new(store: Box<dyn ConfigStore>) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    pub fn with_rng(store: Box<dyn ConfigStore>, rng: StdRng) -> Self {
        let config: PositionConfig = load_config(&*store);
        Self {
            session_config: config.clone(),
            config,
            phase: PositionPhase::Start,
            timer: Timer::new(),
            rng,
            store,
            finished: None,
        }
    }

    pub fn config(&self) -> &PositionConfig {
        &self.config
    }

    /// Config of the session in play, which may predate `config()`.
    pub fn session_config(&self) -> &PositionConfig {
        &self.session_config
    }

    pub fn phase(&self) -> &PositionPhase {
        &self.phase
    }

    pub fn session(&self) -> Option<&PositionSession> {
        self.phase.session()
    }

    pub fn is_timer_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn settings_mut(&mut self) -> Option<&mut SettingsEditor<PositionConfig>> {
        match &mut self.phase {
            PositionPhase::Settings { editor, .. } => Some(editor),
            _ => None,
        }
    }

    pub fn take_finished(&mut self) -> Option<SessionSummary> {
        self.finished.take()
    }

    /// Begins a new session at round one. Accepted from the start and result
    /// screens.
    pub fn start(&mut self, now: Moment) -> bool {
        if !matches!(
            self.phase,
            PositionPhase::Start | PositionPhase::Result { .. }
        ) {
            return false;
        }
        self.timer.cancel();
        self.session_config = self.config.clone();
        let session = PositionSession::new(self.session_config.round_count, now.wall);
        debug!(
            "position session started, {} rounds",
            self.session_config.round_count
        );
        self.phase = self.next_round(session);
        true
    }

    pub fn restart(&mut self) {
        if self.timer.cancel().is_some() {
            debug!("position session abandoned in {}", self.phase.name());
        }
        self.phase = PositionPhase::Start;
    }

    /// Ends the session early and shows the rounds played so far.
    pub fn quit(&mut self, now: Moment) {
        if !matches!(self.phase, PositionPhase::Playing { .. }) {
            return;
        }
        self.timer.cancel();
        if let PositionPhase::Playing { mut session, .. } =
            mem::replace(&mut self.phase, PositionPhase::Start)
        {
            session.end_game(now.wall);
            debug!("position session ended early after {} rounds", session.rounds().len());
            self.finish(session, now);
        }
    }

    /// Places the marker at `position` percent of the bar.
    pub fn select_position(&mut self, position: f64, now: Moment) -> Result<(), GuessError> {
        match &mut self.phase {
            PositionPhase::Playing { round, .. } if round.feedback.is_none() => {
                round.guess = Some(PositionGuess::new(position, now.wall)?);
                Ok(())
            }
            _ => Err(GuessError::NotAwaitingGuess),
        }
    }

    /// Moves the marker by whole cells of a bar drawn `bar_width` cells wide,
    /// starting from the middle when nothing is selected yet.
    pub fn nudge(&mut self, cells: i32, bar_width: u16, now: Moment) -> Result<(), GuessError> {
        let current = match &self.phase {
            PositionPhase::Playing { round, .. } if round.feedback.is_none() => {
                round.guess.map_or(50.0, |g| g.position())
            }
            _ => return Err(GuessError::NotAwaitingGuess),
        };
        let step = 100.0 / f64::from(bar_width.max(1));
        self.select_position(current + f64::from(cells) * step, now)
    }

    /// Scores the selected position and shows feedback until the round
    /// advances. While feedback is showing, submitting again advances at once.
    pub fn submit_guess(&mut self, now: Moment) -> Result<(), GuessError> {
        let showing_feedback = match &self.phase {
            PositionPhase::Playing { round, .. } => round.feedback.is_some(),
            _ => return Err(GuessError::NotAwaitingGuess),
        };
        if showing_feedback {
            self.timer.cancel();
            self.advance(now);
            return Ok(());
        }

        let PositionPhase::Playing { session, round } = &mut self.phase else {
            return Err(GuessError::NotAwaitingGuess);
        };
        let guess = round.guess.ok_or(GuessError::NoSelection)?;
        let result = score_guess(&round.round, guess, &self.session_config);
        debug!(
            "round {}: target {} placed at {:.1}%, accuracy {}",
            result.round_number,
            result.target,
            guess.position(),
            result.accuracy
        );
        session.complete_round(result.clone(), now.wall);
        round.feedback = Some(Feedback {
            rating: Rating::from_accuracy(result.accuracy),
            result,
        });
        self.timer.schedule(
            now.instant,
            self.session_config.feedback_duration(),
            PositionTimerEvent::AdvanceRound,
        );
        Ok(())
    }

    pub fn tick(&mut self, now: Moment) {
        while let Some((fired_at, event)) = self.timer.poll(now.instant) {
            match event {
                PositionTimerEvent::AdvanceRound => {
                    debug!("feedback window closed at {fired_at:?}");
                    self.advance(now)
                }
            }
        }
    }

    fn advance(&mut self, now: Moment) {
        let phase = mem::replace(&mut self.phase, PositionPhase::Start);
        self.phase = match phase {
            PositionPhase::Playing { session, round } if round.feedback.is_some() => {
                if session.is_game_over() {
                    self.finish_phase(session, now)
                } else {
                    self.next_round(session)
                }
            }
            other => {
                debug!("dropping round advance in {}", other.name());
                other
            }
        };
    }

    fn next_round(&mut self, session: PositionSession) -> PositionPhase {
        let round = Round {
            number: session.current_round(),
            target: generate_target(&mut self.rng, &self.session_config),
        };
        PositionPhase::Playing {
            session,
            round: RoundState::new(round),
        }
    }

    fn finish(&mut self, session: PositionSession, now: Moment) {
        self.phase = self.finish_phase(session, now);
    }

    fn finish_phase(&mut self, session: PositionSession, now: Moment) -> PositionPhase {
        let elapsed = session.elapsed(now.wall);
        self.finished = Some(SessionSummary {
            game: GameKind::PositionNumber,
            finished_at: session.ended_at().unwrap_or(now.wall),
            rounds: session.rounds().len() as u32,
            score: session.total_score(),
            max_score: session.max_score(),
            accuracy: session.average_accuracy(),
            items: session.round_count(),
            elapsed_secs: elapsed.num_milliseconds() as f64 / 1000.0,
        });
        PositionPhase::Result { session }
    }

    pub fn open_settings(&mut self, now: Moment) {
        if matches!(self.phase, PositionPhase::Settings { .. }) {
            return;
        }
        let suspended = self.timer.suspend(now.instant);
        let previous = mem::replace(&mut self.phase, PositionPhase::Start);
        self.phase = PositionPhase::Settings {
            editor: SettingsEditor::new(self.config.clone()),
            previous: Box::new(previous),
            suspended,
        };
    }

    pub fn save_settings(
        &mut self,
        config: PositionConfig,
        now: Moment,
    ) -> Result<(), ConfigError> {
        if let Err(e) = config.validate() {
            if let Some(editor) = self.settings_mut() {
                editor.set_error(e.to_string());
            }
            return Err(e);
        }
        if let Err(e) = save_config(&*self.store, &config) {
            warn!("could not persist position settings: {e}");
        }
        self.config = config;
        self.leave_settings(now);
        Ok(())
    }

    pub fn save_draft(&mut self, now: Moment) -> Result<(), ConfigError> {
        let draft = match &self.phase {
            PositionPhase::Settings { editor, .. } => editor.draft().clone(),
            _ => return Ok(()),
        };
        self.save_settings(draft, now)
    }

    pub fn cancel_settings(&mut self, now: Moment) {
        self.leave_settings(now);
    }

    pub fn reset_settings(&mut self, now: Moment) -> Result<(), ConfigError> {
        reset_config::<PositionConfig, _>(&*self.store)?;
        self.config = PositionConfig::default();
        self.leave_settings(now);
        Ok(())
    }

    fn leave_settings(&mut self, now: Moment) {
        if !matches!(self.phase, PositionPhase::Settings { .. }) {
            return;
        }
        if let PositionPhase::Settings {
            previous,
            suspended,
            ..
        } = mem::replace(&mut self.phase, PositionPhase::Start)
        {
            self.phase = *previous;
            if let Some(s) = suspended {
                self.timer.resume(now.instant, s);
            }
        }
    }
}
