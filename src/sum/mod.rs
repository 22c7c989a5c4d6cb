//! Sum Memory: numbers flash one at a time, the player reports their total.

mod config;
pub mod countdown;
mod evaluator;
mod sequencer;

pub use config::{SumConfig, MAX_NUMBER_COUNT};
pub use evaluator::{evaluate, parse_answer, AnswerError, SumResult};
pub use sequencer::{SumGame, SumPhase, SumTimerEvent};
