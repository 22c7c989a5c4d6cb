use crate::config::{check_count, check_duration, check_range, ConfigError, FieldSpec, GameConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MAX_ROUND_COUNT: u32 = 100;
pub const MIN_BAR_WIDTH: u16 = 10;
pub const MAX_BAR_WIDTH: u16 = 200;

// bar width is not user editable
const FIELDS: [FieldSpec; 4] = [
    FieldSpec::new("Minimum number", 0, 50, 1, ""),
    FieldSpec::new("Maximum number", 1, 100, 1, ""),
    FieldSpec::new("Rounds", 1, 20, 1, ""),
    FieldSpec::new("Feedback duration", 500, 3000, 100, "ms"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionConfig {
    pub min_number: i64,
    pub max_number: i64,
    pub round_count: u32,
    #[serde(rename = "feedbackDuration")]
    pub feedback_duration_ms: u64,
    /// Width of the range bar in terminal cells.
    pub bar_width: u16,
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            min_number: 0,
            max_number: 100,
            round_count: 10,
            feedback_duration_ms: 1500,
            bar_width: 50,
        }
    }
}

impl PositionConfig {
    pub fn feedback_duration(&self) -> Duration {
        Duration::from_millis(self.feedback_duration_ms)
    }
}

impl GameConfig for PositionConfig {
    const STORAGE_KEY: &'static str = "position_number";

    fn validate(&self) -> Result<(), ConfigError> {
        check_range(self.min_number, self.max_number)?;
        check_count("Rounds", self.round_count, MAX_ROUND_COUNT)?;
        check_duration("Feedback duration", self.feedback_duration_ms)?;
        if !(MIN_BAR_WIDTH..=MAX_BAR_WIDTH).contains(&self.bar_width) {
            return Err(ConfigError::BarWidth {
                min: MIN_BAR_WIDTH,
                max: MAX_BAR_WIDTH,
            });
        }
        Ok(())
    }

    fn fields() -> &'static [FieldSpec] {
        &FIELDS
    }

    fn field(&self, index: usize) -> i64 {
        match index {
            0 => self.min_number,
            1 => self.max_number,
            2 => i64::from(self.round_count),
            _ => self.feedback_duration_ms as i64,
        }
    }

    fn set_field(&mut self, index: usize, value: i64) {
        match index {
            0 => self.min_number = value,
            1 => self.max_number = value,
            2 => self.round_count = value.max(0) as u32,
            _ => self.feedback_duration_ms = value.max(0) as u64,
        }
    }
}
