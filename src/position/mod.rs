//! Position the Number: place a number on a range bar, round after round.

mod config;
mod evaluator;
mod sequencer;
mod session;

pub use config::{PositionConfig, MAX_BAR_WIDTH, MAX_ROUND_COUNT, MIN_BAR_WIDTH};
pub use evaluator::{
    accuracy, normalize, score_guess, GuessError, PositionGuess, Rating, Round, RoundResult,
};
pub use sequencer::{Feedback, PositionGame, PositionPhase, PositionTimerEvent, RoundState};
pub use session::PositionSession;
