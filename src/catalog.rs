//! Static descriptions of the games offered on the landing page.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum GameKind {
    SumMemory,
    PositionNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameMetadata {
    pub kind: GameKind,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub difficulty: Difficulty,
    pub skills: &'static [&'static str],
}

/// Landing page order.
pub const GAMES: [GameMetadata; 2] = [
    GameMetadata {
        kind: GameKind::SumMemory,
        title: "Sum Memory Game",
        description: "Watch numbers appear one by one, remember them, and calculate their sum!",
        icon: "🧮",
        difficulty: Difficulty::Medium,
        skills: &["Memory", "Mental Math", "Focus"],
    },
    GameMetadata {
        kind: GameKind::PositionNumber,
        title: "Position the Number",
        description: "See a number and click where it belongs on the range bar. Test your number sense!",
        icon: "🎯",
        difficulty: Difficulty::Easy,
        skills: &["Number Sense", "Spatial Reasoning", "Estimation"],
    },
];

pub fn metadata(kind: GameKind) -> &'static GameMetadata {
    match kind {
        GameKind::SumMemory => &GAMES[0],
        GameKind::PositionNumber => &GAMES[1],
    }
}
