//! A single multiple-choice arithmetic problem

use serde::{Deserialize, Serialize};

use crate::consts::OPTION_COUNT;
use crate::error::QuizError;

/// Number of wrong answers shown next to the correct one
pub const DISTRACTOR_COUNT: usize = OPTION_COUNT - 1;

/// One problem: a prompt, its answer and three wrong answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Text shown to the player, e.g. "5 + 3 = ?"
    pub prompt: String,
    pub correct_answer: i32,
    pub distractors: [i32; DISTRACTOR_COUNT],
}

impl Problem {
    pub fn new(prompt: impl Into<String>, correct_answer: i32, distractors: [i32; 3]) -> Self {
        Self {
            prompt: prompt.into(),
            correct_answer,
            distractors,
        }
    }

    /// Unshuffled option set, correct answer first
    pub fn options(&self) -> [i32; OPTION_COUNT] {
        let [a, b, c] = self.distractors;
        [self.correct_answer, a, b, c]
    }

    pub fn is_correct(&self, selected: i32) -> bool {
        selected == self.correct_answer
    }

    /// Check that the four options are distinct and the prompt is non-empty
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.prompt.trim().is_empty() {
            return Err(self.invalid("prompt is empty"));
        }
        if self.distractors.contains(&self.correct_answer) {
            return Err(self.invalid(format!(
                "correct answer {} is also a distractor",
                self.correct_answer
            )));
        }
        let [a, b, c] = self.distractors;
        if a == b || a == c || b == c {
            return Err(self.invalid("distractors are not distinct"));
        }
        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> QuizError {
        QuizError::InvalidProblem {
            prompt: self.prompt.clone(),
            reason: reason.into(),
        }
    }
}
