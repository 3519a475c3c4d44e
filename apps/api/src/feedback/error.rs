use thiserror::Error;

use crate::matching::error::MatchError;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Invalid feedback: {0}")]
    Validation(String),

    /// Not an error condition for callers of the periodic cycle: the previous
    /// weight vector stays in force.
    #[error("Insufficient feedback: {samples} correlated samples, {required} required")]
    InsufficientFeedback { samples: usize, required: usize },

    #[error("Feedback storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Weight adaptation failed: {0}")]
    Adaptation(#[from] MatchError),
}
