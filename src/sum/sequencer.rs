use super::countdown::{CountdownStep, COUNTDOWN_SEQUENCE};
use super::evaluator::{evaluate, parse_answer, AnswerError, SumResult};
use super::SumConfig;
use crate::catalog::GameKind;
use crate::config::{load_config, reset_config, save_config, ConfigError, ConfigStore, GameConfig};
use crate::generator::{generate_sequence, SumChallenge};
use crate::results_log::SessionSummary;
use crate::settings::SettingsEditor;
use crate::timer::{Moment, Suspended, Timer};
use log::{debug, warn};
use rand::{rngs::StdRng, SeedableRng};
use std::mem;

const MAX_DRAFT_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SumTimerEvent {
    CountdownStepDone,
    HideNumber,
    NextNumber,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SumPhase {
    Start,
    Settings {
        editor: SettingsEditor<SumConfig>,
        previous: Box<SumPhase>,
        suspended: Option<Suspended<SumTimerEvent>>,
    },
    Countdown {
        challenge: SumChallenge,
        step: usize,
    },
    Playing {
        challenge: SumChallenge,
        index: usize,
        visible: bool,
    },
    Input {
        challenge: SumChallenge,
        draft: String,
        error: Option<AnswerError>,
    },
    Result {
        challenge: SumChallenge,
        result: SumResult,
    },
}

impl SumPhase {
    pub fn name(&self) -> &'static str {
        match self {
            SumPhase::Start => "Start",
            SumPhase::Settings { .. } => "Settings",
            SumPhase::Countdown { .. } => "Countdown",
            SumPhase::Playing { .. } => "Playing",
            SumPhase::Input { .. } => "Input",
            SumPhase::Result { .. } => "Result",
        }
    }
}

/// Sum Memory screen sequencer.
///
/// Owns the current session outright; the only way to change it is through
/// the command methods below or by delivering timer ticks.
pub struct SumGame {
    config: SumConfig,
    // snapshot taken at `start`, so settings saved mid-session wait for the next one
    session_config: SumConfig,
    phase: SumPhase,
    timer: Timer<SumTimerEvent>,
    rng: StdRng,
    store: Box<dyn ConfigStore>,
    finished: Option<SessionSummary>,
    started_at: Option<Moment>,
}

impl SumGame {
    pub fn new(store: Box<dyn ConfigStore>) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    pub fn with_rng(store: Box<dyn ConfigStore>, rng: StdRng) -> Self {
        let config: SumConfig = load_config(&*store);
        Self {
            session_config: config.clone(),
            config,
            phase: SumPhase::Start,
            timer: Timer::new(),
            rng,
            store,
            finished: None,
            started_at: None,
        }
    }

    pub fn config(&self) -> &SumConfig {
        &self.config
    }

    pub fn phase(&self) -> &SumPhase {
        &self.phase
    }

    pub fn is_timer_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn settings_mut(&mut self) -> Option<&mut SettingsEditor<SumConfig>> {
        match &mut self.phase {
            SumPhase::Settings { editor, .. } => Some(editor),
            _ => None,
        }
    }

    /// Number currently on screen, if any.
    pub fn current_number(&self) -> Option<i64> {
        match &self.phase {
            SumPhase::Playing {
                challenge,
                index,
                visible: true,
            } => challenge.numbers().get(*index).copied(),
            _ => None,
        }
    }

    pub fn countdown_step(&self) -> Option<&'static CountdownStep> {
        match &self.phase {
            SumPhase::Countdown { step, .. } => COUNTDOWN_SEQUENCE.get(*step),
            _ => None,
        }
    }

    /// Summary of the last finished session, handed out once.
    pub fn take_finished(&mut self) -> Option<SessionSummary> {
        self.finished.take()
    }

    /// Generates a fresh challenge and begins the countdown. Accepted from
    /// the start and result screens.
    pub fn start(&mut self, now: Moment) -> bool {
        if !matches!(self.phase, SumPhase::Start | SumPhase::Result { .. }) {
            return false;
        }
        self.timer.cancel();
        self.session_config = self.config.clone();
        let challenge = generate_sequence(&mut self.rng, &self.session_config);
        debug!("sum session started with {} numbers", challenge.len());

        self.started_at = Some(now);
        self.phase = SumPhase::Countdown { challenge, step: 0 };
        self.timer.schedule(
            now.instant,
            COUNTDOWN_SEQUENCE[0].duration,
            SumTimerEvent::CountdownStepDone,
        );
        true
    }

    /// Abandons whatever is in flight and returns to the start screen.
    pub fn restart(&mut self) {
        if self.timer.cancel().is_some() {
            debug!("sum session abandoned in {}", self.phase.name());
        }
        self.started_at = None;
        self.phase = SumPhase::Start;
    }

    pub fn open_settings(&mut self, now: Moment) {
        if matches!(self.phase, SumPhase::Settings { .. }) {
            return;
        }
        let suspended = self.timer.suspend(now.instant);
        let previous = mem::replace(&mut self.phase, SumPhase::Start);
        self.phase = SumPhase::Settings {
            editor: SettingsEditor::new(self.config.clone()),
            previous: Box::new(previous),
            suspended,
        };
    }

    /// Adopts `config` for future sessions and persists it.
    ///
    /// An invalid config is rejected and, when the settings screen is open,
    /// the reason is shown there. A storage failure does not stop the config
    /// from being used for this run.
    pub fn save_settings(&mut self, config: SumConfig, now: Moment) -> Result<(), ConfigError> {
        if let Err(e) = config.validate() {
            if let Some(editor) = self.settings_mut() {
                editor.set_error(e.to_string());
            }
            return Err(e);
        }
        if let Err(e) = save_config(&*self.store, &config) {
            warn!("could not persist sum settings: {e}");
        }
        self.config = config;
        self.leave_settings(now);
        Ok(())
    }

    /// Saves whatever the open settings screen holds.
    pub fn save_draft(&mut self, now: Moment) -> Result<(), ConfigError> {
        let draft = match &self.phase {
            SumPhase::Settings { editor, .. } => editor.draft().clone(),
            _ => return Ok(()),
        };
        self.save_settings(draft, now)
    }

    pub fn cancel_settings(&mut self, now: Moment) {
        self.leave_settings(now);
    }

    /// Forgets the saved config and goes back to the defaults.
    pub fn reset_settings(&mut self, now: Moment) -> Result<(), ConfigError> {
        reset_config::<SumConfig, _>(&*self.store)?;
        self.config = SumConfig::default();
        self.leave_settings(now);
        Ok(())
    }

    fn leave_settings(&mut self, now: Moment) {
        if !matches!(self.phase, SumPhase::Settings { .. }) {
            return;
        }
        if let SumPhase::Settings {
            previous,
            suspended,
            ..
        } = mem::replace(&mut self.phase, SumPhase::Start)
        {
            self.phase = *previous;
            if let Some(s) = suspended {
                self.timer.resume(now.instant, s);
            }
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let SumPhase::Input { draft, error, .. } = &mut self.phase {
            if !c.is_control() && draft.chars().count() < MAX_DRAFT_LEN {
                draft.push(c);
                *error = None;
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let SumPhase::Input { draft, error, .. } = &mut self.phase {
            draft.pop();
            *error = None;
        }
    }

    /// Judges `raw` against the challenge. A value that is not a number
    /// leaves the game in the input phase with the error attached.
    pub fn submit_answer(&mut self, raw: &str, now: Moment) -> Result<(), AnswerError> {
        let answer = match &mut self.phase {
            SumPhase::Input { error, .. } => match parse_answer(raw) {
                Ok(answer) => answer,
                Err(e) => {
                    *error = Some(e.clone());
                    return Err(e);
                }
            },
            _ => return Err(AnswerError::NotAwaitingAnswer),
        };

        if let SumPhase::Input { challenge, .. } = mem::replace(&mut self.phase, SumPhase::Start) {
            let result = evaluate(&challenge, answer);
            debug!(
                "sum answer {} vs {}: correct={}",
                result.user_answer, result.correct_answer, result.is_correct
            );
            self.finished = Some(self.summarize(&challenge, &result, now));
            self.phase = SumPhase::Result { challenge, result };
        }
        Ok(())
    }

    /// Submits the text typed into the input phase.
    pub fn submit_draft(&mut self, now: Moment) -> Result<(), AnswerError> {
        let draft = match &self.phase {
            SumPhase::Input { draft, .. } => draft.clone(),
            _ => return Err(AnswerError::NotAwaitingAnswer),
        };
        self.submit_answer(&draft, now)
    }

    /// Delivers every timer event that is due at `now`, in order.
    pub fn tick(&mut self, now: Moment) {
        while let Some((fired_at, event)) = self.timer.poll(now.instant) {
            self.on_timer(fired_at, event);
        }
    }

    fn on_timer(&mut self, fired_at: std::time::Instant, event: SumTimerEvent) {
        let phase = mem::replace(&mut self.phase, SumPhase::Start);
        self.phase = match (phase, event) {
            (SumPhase::Countdown { challenge, step }, SumTimerEvent::CountdownStepDone) => {
                let next = step + 1;
                match COUNTDOWN_SEQUENCE.get(next) {
                    Some(s) => {
                        self.timer
                            .schedule(fired_at, s.duration, SumTimerEvent::CountdownStepDone);
                        SumPhase::Countdown {
                            challenge,
                            step: next,
                        }
                    }
                    None => self.show_number(fired_at, challenge, 0),
                }
            }
            (
                SumPhase::Playing {
                    challenge,
                    index,
                    visible: true,
                },
                SumTimerEvent::HideNumber,
            ) => {
                self.timer.schedule(
                    fired_at,
                    self.session_config.pause_duration(),
                    SumTimerEvent::NextNumber,
                );
                SumPhase::Playing {
                    challenge,
                    index,
                    visible: false,
                }
            }
            (
                SumPhase::Playing {
                    challenge,
                    index,
                    visible: false,
                },
                SumTimerEvent::NextNumber,
            ) => self.show_number(fired_at, challenge, index + 1),
            (phase, event) => {
                debug!("dropping {event:?} in {}", phase.name());
                phase
            }
        };
    }

    fn show_number(
        &mut self,
        from: std::time::Instant,
        challenge: SumChallenge,
        index: usize,
    ) -> SumPhase {
        if index < challenge.len() {
            self.timer.schedule(
                from,
                self.session_config.display_duration(),
                SumTimerEvent::HideNumber,
            );
            SumPhase::Playing {
                challenge,
                index,
                visible: true,
            }
        } else {
            SumPhase::Input {
                challenge,
                draft: String::new(),
                error: None,
            }
        }
    }

    fn summarize(
        &self,
        challenge: &SumChallenge,
        result: &SumResult,
        now: Moment,
    ) -> SessionSummary {
        let elapsed = self
            .started_at
            .map(|s| now.instant.saturating_duration_since(s.instant))
            .unwrap_or_default();
        SessionSummary {
            game: GameKind::SumMemory,
            finished_at: now.wall,
            rounds: 1,
            score: u32::from(result.is_correct),
            max_score: 1,
            accuracy: if result.is_correct { 100.0 } else { 0.0 },
            items: challenge.len() as u32,
            elapsed_secs: elapsed.as_secs_f64(),
        }
    }
}
