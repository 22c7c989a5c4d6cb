use crate::generator::SumChallenge;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("Please enter your answer")]
    Empty,
    #[error("\"{0}\" is not a number")]
    NotANumber(String),
    #[error("No answer is expected right now")]
    NotAwaitingAnswer,
}

/// Outcome of a Sum Memory session as shown on the result screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SumResult {
    pub is_correct: bool,
    pub user_answer: f64,
    pub correct_answer: i64,
    pub title: &'static str,
    pub message: &'static str,
    pub icon: &'static str,
}

/// Exact comparison of the player's answer with the challenge total.
/// A fractional answer can never match.
pub fn evaluate(challenge: &SumChallenge, user_answer: f64) -> SumResult {
    let correct_answer = challenge.sum();
    let is_correct = user_answer == correct_answer as f64;

    SumResult {
        is_correct,
        user_answer,
        correct_answer,
        title: if is_correct { "Correct!" } else { "Wrong!" },
        message: if is_correct {
            "Great memory and calculation skills!"
        } else {
            "Close, but not quite. Try again!"
        },
        icon: if is_correct { "🎉" } else { "❌" },
    }
}

/// Reads any finite decimal. `inf` and `NaN` are not answers.
pub fn parse_answer(input: &str) -> Result<f64, AnswerError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AnswerError::Empty);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(AnswerError::NotANumber(trimmed.to_string())),
    }
}
