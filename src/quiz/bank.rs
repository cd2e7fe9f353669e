//! Problem banks keyed by difficulty tier
//!
//! A bank is immutable once built. Built-in banks live in `catalog`; a bank
//! can also be loaded from JSON with the same shape as its serde form.

use serde::{Deserialize, Serialize};

use super::problem::Problem;
use crate::error::QuizError;

/// Feedback text shown after an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMessages {
    /// Shown on a correct answer
    pub correct: String,
    /// Shown on a wrong answer, followed by the correct answer
    pub incorrect_prefix: String,
}

impl Default for FeedbackMessages {
    fn default() -> Self {
        Self {
            correct: "Correct! +100 points".to_string(),
            incorrect_prefix: "Incorrect. The correct answer is".to_string(),
        }
    }
}

impl FeedbackMessages {
    pub fn new(correct: impl Into<String>, incorrect_prefix: impl Into<String>) -> Self {
        Self {
            correct: correct.into(),
            incorrect_prefix: incorrect_prefix.into(),
        }
    }

    /// Message revealing the correct answer
    pub fn incorrect(&self, correct_answer: i32) -> String {
        format!("{} {}", self.incorrect_prefix, correct_answer)
    }
}

/// One difficulty tier and its problems
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// Stable id used for selection, e.g. "beginner"
    pub id: String,
    /// Display name, e.g. "Coral Reef"
    pub label: String,
    pub problems: Vec<Problem>,
}

impl Tier {
    pub fn new(id: impl Into<String>, label: impl Into<String>, problems: Vec<Problem>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            problems,
        }
    }
}

/// Ordered set of difficulty tiers plus the variant's feedback text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemBank {
    #[serde(default)]
    pub messages: FeedbackMessages,
    tiers: Vec<Tier>,
}

impl ProblemBank {
    /// Build a bank, rejecting empty tiers and invalid problems
    pub fn new(messages: FeedbackMessages, tiers: Vec<Tier>) -> Result<Self, QuizError> {
        let bank = Self { messages, tiers };
        bank.validate()?;
        Ok(bank)
    }

    /// Parse and validate a bank from JSON
    pub fn from_json(json: &str) -> Result<Self, QuizError> {
        let bank: ProblemBank = serde_json::from_str(json)?;
        bank.validate()?;
        log::info!(
            "Loaded problem bank with {} tiers ({} problems)",
            bank.tiers.len(),
            bank.problem_count()
        );
        Ok(bank)
    }

    pub fn validate(&self) -> Result<(), QuizError> {
        for tier in &self.tiers {
            if tier.problems.is_empty() {
                return Err(QuizError::EmptyTier(tier.id.clone()));
            }
            for problem in &tier.problems {
                problem.validate()?;
            }
        }
        Ok(())
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn tier(&self, id: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.id == id)
    }

    /// Problems of a tier; empty for an unknown tier
    pub fn problems(&self, id: &str) -> &[Problem] {
        self.tier(id).map(|t| t.problems.as_slice()).unwrap_or(&[])
    }

    pub fn has_tier(&self, id: &str) -> bool {
        self.tier(id).is_some()
    }

    pub fn tier_ids(&self) -> impl Iterator<Item = &str> {
        self.tiers.iter().map(|t| t.id.as_str())
    }

    /// First tier id, used as the default selection
    pub fn default_tier(&self) -> Option<&str> {
        self.tiers.first().map(|t| t.id.as_str())
    }

    pub fn problem_count(&self) -> usize {
        self.tiers.iter().map(|t| t.problems.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tier() -> Tier {
        Tier::new(
            "easy",
            "Easy",
            vec![
                Problem::new("5 + 3 = ?", 8, [7, 9, 6]),
                Problem::new("2 + 2 = ?", 4, [3, 5, 6]),
            ],
        )
    }

    #[test]
    fn test_lookup_by_tier_id() {
        let bank = ProblemBank::new(FeedbackMessages::default(), vec![sample_tier()]).unwrap();
        assert!(bank.has_tier("easy"));
        assert_eq!(bank.problems("easy").len(), 2);
        assert!(bank.problems("missing").is_empty());
        assert_eq!(bank.default_tier(), Some("easy"));
        assert_eq!(bank.problem_count(), 2);
    }

    #[test]
    fn test_empty_tier_rejected() {
        let tiers = vec![sample_tier(), Tier::new("hard", "Hard", Vec::new())];
        let err = ProblemBank::new(FeedbackMessages::default(), tiers).unwrap_err();
        assert!(matches!(err, QuizError::EmptyTier(ref id) if id == "hard"));
    }

    #[test]
    fn test_from_json_defaults_messages() {
        let json = r#"{
            "tiers": [
                {
                    "id": "easy",
                    "label": "Easy",
                    "problems": [
                        {"prompt": "5 + 3 = ?", "correct_answer": 8, "distractors": [7, 9, 6]}
                    ]
                }
            ]
        }"#;
        let bank = ProblemBank::from_json(json).unwrap();
        assert_eq!(bank.messages, FeedbackMessages::default());
        assert_eq!(bank.tier("easy").unwrap().label, "Easy");
    }

    #[test]
    fn test_from_json_rejects_invalid_problem() {
        let json = r#"{"tiers": [{"id": "x", "label": "X", "problems": [
            {"prompt": "1 + 1 = ?", "correct_answer": 2, "distractors": [2, 3, 4]}
        ]}]}"#;
        let err = ProblemBank::from_json(json).unwrap_err();
        assert!(matches!(err, QuizError::InvalidProblem { .. }));
    }

    #[test]
    fn test_from_json_reports_parse_error() {
        let err = ProblemBank::from_json("{ not json").unwrap_err();
        assert!(matches!(err, QuizError::Json(_)));
        assert!(err.is_data_error());
    }

    #[test]
    fn test_incorrect_message_reveals_answer() {
        let messages = FeedbackMessages::default();
        assert_eq!(messages.incorrect(8), "Incorrect. The correct answer is 8");
    }
}
