//! Built-in game variants and their problem banks
//!
//! Every variant plays on the same engine; they differ only in problems,
//! tier names and feedback text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::quiz::{FeedbackMessages, Problem, ProblemBank, Tier};

/// Games listed in the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameVariant {
    Space,
    Ocean,
    /// Listed but not playable yet
    Quantum,
}

type Row = (&'static str, i32, [i32; 3]);

const SPACE_BEGINNER: &[Row] = &[
    ("5 + 3 = ?", 8, [7, 9, 6]),
    ("12 - 4 = ?", 8, [6, 10, 16]),
    ("7 + 6 = ?", 13, [12, 14, 11]),
    ("15 - 8 = ?", 7, [6, 8, 23]),
    ("9 + 4 = ?", 13, [12, 14, 5]),
    ("20 - 7 = ?", 13, [12, 14, 27]),
    ("6 + 8 = ?", 14, [13, 15, 2]),
    ("18 - 9 = ?", 9, [8, 10, 27]),
];

const SPACE_EXPLORER: &[Row] = &[
    ("8 × 7 = ?", 56, [54, 48, 52]),
    ("63 ÷ 9 = ?", 7, [6, 8, 9]),
    ("9 × 6 = ?", 54, [52, 56, 48]),
    ("72 ÷ 8 = ?", 9, [8, 10, 12]),
    ("7 × 9 = ?", 63, [54, 72, 56]),
    ("48 ÷ 6 = ?", 8, [7, 9, 6]),
    ("6 × 8 = ?", 48, [42, 54, 56]),
    ("81 ÷ 9 = ?", 9, [8, 10, 7]),
];

const SPACE_ASTRONAUT: &[Row] = &[
    ("25² = ?", 625, [525, 725, 675]),
    ("√144 = ?", 12, [11, 13, 14]),
    ("15² - 13² = ?", 56, [52, 60, 48]),
    ("∛125 = ?", 5, [4, 6, 3]),
    ("8³ = ?", 512, [256, 768, 612]),
    ("√225 = ?", 15, [14, 16, 13]),
    ("12² + 5² = ?", 169, [144, 194, 149]),
    ("∛216 = ?", 6, [5, 7, 8]),
];

const OCEAN_SHALLOW: &[Row] = &[
    ("5 + 8 = ?", 13, [11, 15, 10]),
    ("16 - 7 = ?", 9, [8, 10, 23]),
    ("12 + 9 = ?", 21, [20, 22, 3]),
    ("25 - 8 = ?", 17, [15, 19, 33]),
    ("14 + 6 = ?", 20, [18, 22, 8]),
    ("30 - 12 = ?", 18, [16, 20, 42]),
    ("7 + 15 = ?", 22, [21, 23, 8]),
    ("28 - 9 = ?", 19, [18, 20, 37]),
];

const OCEAN_DEEP: &[Row] = &[
    ("9 × 7 = ?", 63, [56, 72, 54]),
    ("84 ÷ 12 = ?", 7, [6, 8, 12]),
    ("8 × 9 = ?", 72, [63, 81, 64]),
    ("96 ÷ 8 = ?", 12, [11, 13, 8]),
    ("7 × 11 = ?", 77, [70, 84, 66]),
    ("132 ÷ 11 = ?", 12, [11, 13, 10]),
    ("6 × 13 = ?", 78, [72, 84, 65]),
    ("144 ÷ 12 = ?", 12, [11, 13, 14]),
];

const OCEAN_ABYSS: &[Row] = &[
    ("17² = ?", 289, [279, 299, 269]),
    ("√324 = ?", 18, [17, 19, 16]),
    ("13³ = ?", 2197, [2187, 2207, 2177]),
    ("∛729 = ?", 9, [8, 10, 7]),
    ("19² = ?", 361, [351, 371, 341]),
    ("√441 = ?", 21, [20, 22, 19]),
    ("11³ = ?", 1331, [1321, 1341, 1311]),
    ("∛512 = ?", 8, [7, 9, 6]),
];

fn tier(id: &str, label: &str, rows: &[Row]) -> Tier {
    let problems = rows
        .iter()
        .map(|&(prompt, answer, distractors)| Problem::new(prompt, answer, distractors))
        .collect();
    Tier::new(id, label, problems)
}

impl GameVariant {
    /// Portal order
    pub const ALL: [GameVariant; 3] = [GameVariant::Space, GameVariant::Ocean, GameVariant::Quantum];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameVariant::Space => "space",
            GameVariant::Ocean => "ocean",
            GameVariant::Quantum => "quantum",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameVariant::Space => "Space Adventure",
            GameVariant::Ocean => "Ocean Depths",
            GameVariant::Quantum => "Quantum Realm",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            GameVariant::Space => "Mathematical Journey Through the Cosmos",
            GameVariant::Ocean => "Underwater Mathematical Expedition",
            GameVariant::Quantum => "Coming Soon",
        }
    }

    /// Heading of the end-of-round screen
    pub fn completion_title(&self) -> &'static str {
        match self {
            GameVariant::Space | GameVariant::Quantum => "Mission Complete!",
            GameVariant::Ocean => "Expedition Complete!",
        }
    }

    pub fn is_coming_soon(&self) -> bool {
        matches!(self, GameVariant::Quantum)
    }

    /// Difficulty names shown on the portal card
    pub fn tier_labels(&self) -> &'static [&'static str] {
        match self {
            GameVariant::Space => &["Beginner", "Explorer", "Astronaut"],
            GameVariant::Ocean => &["Coral Reef", "Midnight Zone", "Abyssal Plains"],
            GameVariant::Quantum => &["Novice", "Expert", "Quantum"],
        }
    }

    /// The variant's built-in problem bank
    pub fn bank(&self) -> Result<ProblemBank, QuizError> {
        match self {
            GameVariant::Space => ProblemBank::new(
                FeedbackMessages::new(
                    "Excellent! +100 points",
                    "Incorrect. The correct answer is",
                ),
                vec![
                    tier("beginner", "Beginner", SPACE_BEGINNER),
                    tier("explorer", "Explorer", SPACE_EXPLORER),
                    tier("astronaut", "Astronaut", SPACE_ASTRONAUT),
                ],
            ),
            GameVariant::Ocean => ProblemBank::new(
                FeedbackMessages::new(
                    "Perfect! You found the treasure! +100 pearls",
                    "Not quite right. The answer is",
                ),
                vec![
                    tier("shallow", "Coral Reef", OCEAN_SHALLOW),
                    tier("deep", "Midnight Zone", OCEAN_DEEP),
                    tier("abyss", "Abyssal Plains", OCEAN_ABYSS),
                ],
            ),
            GameVariant::Quantum => Err(QuizError::ComingSoon(self.title().to_string())),
        }
    }
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for GameVariant {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "space" => Ok(GameVariant::Space),
            "ocean" => Ok(GameVariant::Ocean),
            "quantum" => Ok(GameVariant::Quantum),
            _ => Err(QuizError::UnknownVariant(s.to_string())),
        }
    }
}
