//! Error types for bank data, settings and navigation.
//!
//! The round engine itself never fails; these cover the edges where data or
//! user navigation can be malformed.

use thiserror::Error;

/// Errors raised outside the round engine.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Bank or settings JSON could not be parsed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A problem record breaks the option-set invariant.
    #[error("invalid problem {prompt:?}: {reason}")]
    InvalidProblem { prompt: String, reason: String },

    /// A difficulty tier has no problems.
    #[error("difficulty tier {0:?} has no problems")]
    EmptyTier(String),

    /// A difficulty tier id does not exist in the bank.
    #[error("unknown difficulty tier {0:?}")]
    UnknownTier(String),

    /// The variant is listed in the portal but not playable yet.
    #[error("{0} is coming soon")]
    ComingSoon(String),

    /// A variant name did not match any known variant.
    #[error("unknown game variant {0:?}")]
    UnknownVariant(String),

    /// A game was started without opening a playable variant first.
    #[error("no game variant selected")]
    NoVariantSelected,

    /// Settings values outside their valid range.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

impl QuizError {
    /// Returns `true` if the error comes from malformed data rather than navigation.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            QuizError::Json(_)
                | QuizError::InvalidProblem { .. }
                | QuizError::EmptyTier(_)
                | QuizError::InvalidSettings(_)
        )
    }
}
