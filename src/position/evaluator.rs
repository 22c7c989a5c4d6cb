use super::PositionConfig;
use chrono::{DateTime, Local};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuessError {
    #[error("Pick a spot on the bar first")]
    NoSelection,
    #[error("Position must be a number")]
    NotANumber,
    #[error("No round is waiting for a guess")]
    NotAwaitingGuess,
}

/// One target to place on the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    pub number: u32,
    pub target: i64,
}

/// Where the player put the marker, on a 0..=100 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionGuess {
    position: f64,
    at: DateTime<Local>,
}

impl PositionGuess {
    /// Clamps `position` into `[0, 100]`; NaN has no place on the bar.
    pub fn new(position: f64, at: DateTime<Local>) -> Result<Self, GuessError> {
        if position.is_nan() {
            return Err(GuessError::NotANumber);
        }
        Ok(Self {
            position: position.clamp(0.0, 100.0),
            at,
        })
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn at(&self) -> DateTime<Local> {
        self.at
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub round_number: u32,
    pub target: i64,
    pub guess: PositionGuess,
    pub normalized_target: f64,
    pub accuracy: u8,
    pub points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Rating {
    #[strum(to_string = "Excellent!")]
    Excellent,
    #[strum(to_string = "Good!")]
    Good,
    #[strum(to_string = "Not bad!")]
    NotBad,
    #[strum(to_string = "Try again!")]
    TryAgain,
}

impl Rating {
    pub fn from_accuracy(accuracy: u8) -> Self {
        match accuracy {
            90..=u8::MAX => Rating::Excellent,
            75..=89 => Rating::Good,
            50..=74 => Rating::NotBad,
            _ => Rating::TryAgain,
        }
    }
}

/// Linear map of `value` from `[min, max]` onto `[0, 100]`; 50 when the
/// range is empty.
pub fn normalize(value: i64, min: i64, max: i64) -> f64 {
    if max == min {
        return 50.0;
    }
    (value - min) as f64 / (max - min) as f64 * 100.0
}

/// 100 minus the distance between target and guess, floored at 0 and
/// rounded to a whole percent.
pub fn accuracy(normalized_target: f64, position: f64) -> u8 {
    let raw = 100.0 - (normalized_target - position).abs();
    raw.clamp(0.0, 100.0).round() as u8
}

/// Scores one guess. This is the only place accuracy is computed.
pub fn score_guess(round: &Round, guess: PositionGuess, config: &PositionConfig) -> RoundResult {
    let normalized_target = normalize(round.target, config.min_number, config.max_number);
    let accuracy = accuracy(normalized_target, guess.position());
    RoundResult {
        round_number: round.number,
        target: round.target,
        guess,
        normalized_target,
        accuracy,
        points: u32::from(accuracy),
    }
}
