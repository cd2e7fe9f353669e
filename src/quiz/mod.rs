//! Quiz round module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - Seeded RNG only
//! - Virtual clock only (timers advance when the owner says so)
//! - Rendering reads `RoundState`, never writes it

pub mod bank;
pub mod engine;
pub mod problem;
pub mod session;
pub mod shuffle;
pub mod state;
pub mod timer;

pub use bank::{FeedbackMessages, ProblemBank, Tier};
pub use engine::{HoldToken, QuizEngine};
pub use problem::Problem;
pub use session::{QuizSession, TimerTask};
pub use shuffle::{shuffle_in_place, shuffle_options};
pub use state::{EndReason, Feedback, QuizEvent, RoundState, RoundSummary, SessionPhase};
pub use timer::{Scheduler, TaskHandle};
