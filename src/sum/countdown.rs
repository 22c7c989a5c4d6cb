use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Light {
    Red,
    Yellow,
    Green,
}

/// One timed step of the traffic-light countdown before the numbers start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownStep {
    pub light: Light,
    pub text: &'static str,
    pub duration: Duration,
}

pub const COUNTDOWN_SEQUENCE: [CountdownStep; 3] = [
    CountdownStep {
        light: Light::Red,
        text: "Preparing...",
        duration: Duration::from_millis(1000),
    },
    CountdownStep {
        light: Light::Yellow,
        text: "Ready...",
        duration: Duration::from_millis(1000),
    },
    CountdownStep {
        light: Light::Green,
        text: "GO!",
        duration: Duration::from_millis(500),
    },
];

pub fn total_countdown() -> Duration {
    COUNTDOWN_SEQUENCE.iter().map(|s| s.duration).sum()
}
