//! Round state and events
//!
//! All state a rendering layer may read lives here. Only the engine mutates it.

use serde::{Deserialize, Serialize};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for an answer, countdown running
    Playing,
    /// Showing the result of the last answer
    Feedback,
    /// Round over (time up or all problems answered)
    Ended,
}

/// Result of the last answer, shown in the feedback overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub is_correct: bool,
    pub message: String,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    TimeUp,
    AllAnswered,
}

/// Things that happened during a round, drained by the frontend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    /// A problem was put on screen with freshly shuffled options
    ProblemPresented { index: usize },
    AnswerCorrect { selected: i32 },
    AnswerIncorrect { selected: i32, correct_answer: i32 },
    /// Countdown reached zero
    TimeUp,
    /// All problems of the round were answered
    RoundComplete,
}

/// Mutable per-session record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    /// Generation counter, bumped on every start/reset
    pub session_id: u64,
    pub score: u32,
    pub time_remaining_secs: u32,
    pub current_problem_index: usize,
    pub problems_completed: u32,
    /// Options in display order (empty if there is no current problem)
    pub presented_options: Vec<i32>,
    pub phase: SessionPhase,
    pub last_feedback: Option<Feedback>,
    /// Consecutive correct answers
    pub streak: u32,
    pub best_streak: u32,
    pub correct_count: u32,
    pub end_reason: Option<EndReason>,
}

impl RoundState {
    /// Fresh state for a new session
    pub fn new(session_id: u64, round_seconds: u32) -> Self {
        Self {
            session_id,
            score: 0,
            time_remaining_secs: round_seconds,
            current_problem_index: 0,
            problems_completed: 0,
            presented_options: Vec::new(),
            phase: SessionPhase::Playing,
            last_feedback: None,
            streak: 0,
            best_streak: 0,
            correct_count: 0,
            end_reason: None,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    pub fn accepts_answers(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    /// Percentage of answered problems that were correct
    pub fn accuracy_percent(&self) -> u32 {
        if self.problems_completed == 0 {
            0
        } else {
            self.correct_count * 100 / self.problems_completed
        }
    }

    pub fn summary(&self) -> RoundSummary {
        RoundSummary {
            score: self.score,
            problems_completed: self.problems_completed,
            correct_count: self.correct_count,
            accuracy_percent: self.accuracy_percent(),
            best_streak: self.best_streak,
            ended_by: self.end_reason,
        }
    }
}

/// End-of-round numbers for the completion screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub score: u32,
    pub problems_completed: u32,
    pub correct_count: u32,
    pub accuracy_percent: u32,
    pub best_streak: u32,
    /// None while the round is still running
    pub ended_by: Option<EndReason>,
}
