//! Math Voyage - timed arithmetic quiz mini-games
//!
//! Core modules:
//! - `quiz`: Round engine (problem selection, shuffle, countdown, scoring)
//! - `catalog`: Built-in game variants and their problem banks
//! - `app`: Navigation between the portal, difficulty menus and gameplay
//! - `settings`: Round configuration and remembered menu selection

pub mod app;
pub mod catalog;
pub mod error;
pub mod quiz;
pub mod settings;

pub use app::{App, View};
pub use catalog::GameVariant;
pub use error::QuizError;
pub use settings::{RoundConfig, Settings};

/// Game configuration constants
pub mod consts {
    /// Countdown length of a round
    pub const ROUND_SECONDS: u32 = 60;
    /// Answers needed to complete a round
    pub const PROBLEMS_PER_ROUND: u32 = 10;
    /// Flat reward for a correct answer
    pub const POINTS_PER_CORRECT: u32 = 100;
    /// Upper bound accepted for a configured reward
    pub const MAX_POINTS_PER_CORRECT: u32 = 10_000;
    /// How long the feedback overlay stays up before the next problem
    pub const FEEDBACK_HOLD_MS: u64 = 2000;
    /// Countdown granularity
    pub const TICK_INTERVAL_MS: u64 = 1000;
    /// Correct answer plus three distractors
    pub const OPTION_COUNT: usize = 4;
    /// Largest frame delta fed to the session (prevents a burst of ticks after a stall)
    pub const MAX_FRAME_MS: u64 = 250;
}
