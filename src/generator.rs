use crate::position::PositionConfig;
use crate::sum::SumConfig;
use rand::Rng;

/// The numbers shown in one Sum Memory session together with their total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SumChallenge {
    numbers: Vec<i64>,
    sum: i64,
}

impl SumChallenge {
    pub fn new(numbers: Vec<i64>) -> Self {
        let sum = numbers.iter().sum();
        Self { numbers, sum }
    }

    pub fn numbers(&self) -> &[i64] {
        &self.numbers
    }

    pub fn sum(&self) -> i64 {
        self.sum
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Draws `number_count` independent values from `[min_number, max_number]`.
pub fn generate_sequence<R: Rng + ?Sized>(rng: &mut R, config: &SumConfig) -> SumChallenge {
    let numbers = (0..config.number_count)
        .map(|_| draw(rng, config.min_number, config.max_number))
        .collect();
    SumChallenge::new(numbers)
}

pub fn generate_target<R: Rng + ?Sized>(rng: &mut R, config: &PositionConfig) -> i64 {
    draw(rng, config.min_number, config.max_number)
}
