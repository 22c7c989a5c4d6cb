use crate::config::{check_count, check_duration, check_range, ConfigError, FieldSpec, GameConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MAX_NUMBER_COUNT: u32 = 100;

const FIELDS: [FieldSpec; 5] = [
    FieldSpec::new("Number count", 1, 10, 1, ""),
    FieldSpec::new("Minimum number", 0, 50, 1, ""),
    FieldSpec::new("Maximum number", 1, 100, 1, ""),
    FieldSpec::new("Display duration", 500, 5000, 100, "ms"),
    FieldSpec::new("Pause duration", 100, 2000, 50, "ms"),
];

/// Tunables for one Sum Memory session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SumConfig {
    pub number_count: u32,
    pub min_number: i64,
    pub max_number: i64,
    #[serde(rename = "displayDuration")]
    pub display_duration_ms: u64,
    #[serde(rename = "pauseDuration")]
    pub pause_duration_ms: u64,
}

impl Default for SumConfig {
    fn default() -> Self {
        Self {
            number_count: 5,
            min_number: 1,
            max_number: 10,
            display_duration_ms: 1500,
            pause_duration_ms: 500,
        }
    }
}

impl SumConfig {
    pub fn display_duration(&self) -> Duration {
        Duration::from_millis(self.display_duration_ms)
    }

    pub fn pause_duration(&self) -> Duration {
        Duration::from_millis(self.pause_duration_ms)
    }
}

impl GameConfig for SumConfig {
    const STORAGE_KEY: &'static str = "sum_memory";

    fn validate(&self) -> Result<(), ConfigError> {
        check_count("Number count", self.number_count, MAX_NUMBER_COUNT)?;
        check_range(self.min_number, self.max_number)?;
        check_duration("Display duration", self.display_duration_ms)?;
        check_duration("Pause duration", self.pause_duration_ms)
    }

    fn fields() -> &'static [FieldSpec] {
        &FIELDS
    }

    fn field(&self, index: usize) -> i64 {
        match index {
            0 => i64::from(self.number_count),
            1 => self.min_number,
            2 => self.max_number,
            3 => self.display_duration_ms as i64,
            _ => self.pause_duration_ms as i64,
        }
    }

    fn set_field(&mut self, index: usize, value: i64) {
        match index {
            0 => self.number_count = value.max(0) as u32,
            1 => self.min_number = value,
            2 => self.max_number = value,
            3 => self.display_duration_ms = value.max(0) as u64,
            _ => self.pause_duration_ms = value.max(0) as u64,
        }
    }
}
