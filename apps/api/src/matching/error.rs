use thiserror::Error;

/// Errors raised by the matching engine.
///
/// Only `Validation` ever reaches a caller of `recommend`; `DataUnavailable` is
/// turned into a degraded empty result and `Computation` is isolated to the
/// single candidate that caused it.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Cannot score candidate {candidate_id}: {reason}")]
    Computation {
        candidate_id: String,
        reason: String,
    },
}

impl MatchError {
    pub fn computation(candidate_id: impl Into<String>, reason: impl Into<String>) -> Self {
        MatchError::Computation {
            candidate_id: candidate_id.into(),
            reason: reason.into(),
        }
    }
}
