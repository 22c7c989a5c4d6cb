use super::evaluator::RoundResult;
use chrono::{DateTime, Duration, Local};
use log::debug;

/// Running tally of a Position the Number session.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSession {
    rounds: Vec<RoundResult>,
    current_round: u32,
    total_score: u32,
    round_count: u32,
    is_game_over: bool,
    started_at: DateTime<Local>,
    ended_at: Option<DateTime<Local>>,
}

impl PositionSession {
    pub fn new(round_count: u32, started_at: DateTime<Local>) -> Self {
        Self {
            rounds: Vec::with_capacity(round_count as usize),
            current_round: 1,
            total_score: 0,
            round_count,
            is_game_over: false,
            started_at,
            ended_at: None,
        }
    }

    pub fn rounds(&self) -> &[RoundResult] {
        &self.rounds
    }

    pub fn last_round(&self) -> Option<&RoundResult> {
        self.rounds.last()
    }

    /// 1-based number of the round being played next.
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn round_count(&self) -> u32 {
        self.round_count
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    /// Best total attainable over the rounds actually played.
    pub fn max_score(&self) -> u32 {
        self.rounds.len() as u32 * 100
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Local>> {
        self.ended_at
    }

    /// Records a finished round. Returns false once the session is over.
    pub fn complete_round(&mut self, result: RoundResult, now: DateTime<Local>) -> bool {
        if self.is_game_over {
            debug!("round {} arrived after game over", result.round_number);
            return false;
        }
        self.total_score += result.points;
        self.rounds.push(result);
        self.current_round += 1;

        if self.rounds.len() >= self.round_count as usize {
            self.is_game_over = true;
            self.ended_at = Some(now);
        }
        true
    }

    /// Stops the session early.
    pub fn end_game(&mut self, now: DateTime<Local>) {
        if self.is_game_over {
            return;
        }
        self.is_game_over = true;
        self.ended_at = Some(now);
    }

    pub fn average_accuracy(&self) -> f64 {
        if self.rounds.is_empty() {
            return 0.0;
        }
        let total: f64 = self.rounds.iter().map(|r| f64::from(r.accuracy)).sum();
        total / self.rounds.len() as f64
    }

    /// Population standard deviation of round accuracies.
    pub fn accuracy_spread(&self) -> f64 {
        if self.rounds.is_empty() {
            return 0.0;
        }
        let mean = self.average_accuracy();
        let variance = self
            .rounds
            .iter()
            .map(|r| {
                let diff = f64::from(r.accuracy) - mean;
                diff * diff
            })
            .sum::<f64>()
            / self.rounds.len() as f64;
        variance.sqrt()
    }

    /// Highest-accuracy round; the earliest one wins a tie.
    pub fn best_round(&self) -> Option<&RoundResult> {
        self.rounds.iter().fold(None, |best, r| match best {
            Some(b) if b.accuracy >= r.accuracy => Some(b),
            _ => Some(r),
        })
    }

    /// Lowest-accuracy round; the earliest one wins a tie.
    pub fn worst_round(&self) -> Option<&RoundResult> {
        self.rounds.iter().fold(None, |worst, r| match worst {
            Some(w) if w.accuracy <= r.accuracy => Some(w),
            _ => Some(r),
        })
    }

    pub fn elapsed(&self, now: DateTime<Local>) -> Duration {
        self.ended_at.unwrap_or(now) - self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::evaluator::PositionGuess;

    fn result(round_number: u32, accuracy: u8) -> RoundResult {
        RoundResult {
            round_number,
            target: 0,
            guess: PositionGuess::new(0.0, Local::now()).unwrap(),
            normalized_target: 0.0,
            accuracy,
            points: u32::from(accuracy),
        }
    }

    #[test]
    fn game_over_after_configured_rounds() {
        let t0 = Local::now();
        let mut session = PositionSession::new(3, t0);
        for (i, acc) in [100, 80, 60].into_iter().enumerate() {
            assert!(!session.is_game_over());
            assert!(session.complete_round(result(i as u32 + 1, acc), t0));
        }
        assert!(session.is_game_over());
        assert_eq!(session.rounds().len(), 3);
        assert_eq!(session.total_score(), 240);
        assert_eq!(session.max_score(), 300);
        assert_eq!(session.current_round(), 4);
        assert_eq!(session.average_accuracy(), 80.0);
        assert!(session.ended_at().is_some());
    }

    #[test]
    fn rounds_after_game_over_are_refused() {
        let t0 = Local::now();
        let mut session = PositionSession::new(1, t0);
        assert!(session.complete_round(result(1, 50), t0));
        assert!(!session.complete_round(result(2, 70), t0));
        assert_eq!(session.rounds().len(), 1);
        assert_eq!(session.total_score(), 50);
    }

    #[test]
    fn empty_session_statistics() {
        let session = PositionSession::new(5, Local::now());
        assert_eq!(session.average_accuracy(), 0.0);
        assert_eq!(session.accuracy_spread(), 0.0);
        assert!(session.best_round().is_none());
        assert!(session.worst_round().is_none());
    }

    #[test]
    fn best_and_worst_prefer_first_on_ties() {
        let t0 = Local::now();
        let mut session = PositionSession::new(5, t0);
        for (i, acc) in [70, 90, 40, 90, 40].into_iter().enumerate() {
            session.complete_round(result(i as u32 + 1, acc), t0);
        }
        assert_eq!(session.best_round().map(|r| r.round_number), Some(2));
        assert_eq!(session.worst_round().map(|r| r.round_number), Some(3));
    }

    #[test]
    fn early_end_stamps_time_immediately() {
        let t0 = Local::now();
        let mut session = PositionSession::new(10, t0);
        session.complete_round(result(1, 90), t0);
        let stop = t0 + Duration::seconds(42);
        session.end_game(stop);
        assert!(session.is_game_over());
        assert_eq!(session.ended_at(), Some(stop));
        assert_eq!(session.elapsed(stop + Duration::seconds(100)).num_seconds(), 42);
    }

    #[test]
    fn elapsed_runs_until_the_session_ends() {
        let t0 = Local::now();
        let session = PositionSession::new(10, t0);
        assert_eq!(session.elapsed(t0 + Duration::seconds(7)).num_seconds(), 7);
    }

    #[test]
    fn spread_of_uniform_rounds_is_zero() {
        let t0 = Local::now();
        let mut session = PositionSession::new(3, t0);
        for i in 1..=3 {
            session.complete_round(result(i, 75), t0);
        }
        assert_eq!(session.accuracy_spread(), 0.0);
    }
}
