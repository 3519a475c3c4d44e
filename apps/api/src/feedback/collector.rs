//! Feedback Collector: records outcomes and drives the weight adaptation cycle.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::feedback::adaptation::{adapt, outcome_value, Sample};
use crate::feedback::error::FeedbackError;
use crate::feedback::models::{FeedbackAck, FeedbackEntry, FeedbackRecord, NewFeedback};
use crate::feedback::repository::FeedbackRepository;
use crate::feedback::served::ServedScoreLog;
use crate::matching::types::RecommendationSet;
use crate::matching::weights::{WeightStore, WeightVector};

const MAX_FREE_TEXT_CHARS: usize = 4000;

#[derive(Debug, Clone)]
pub struct FeedbackConfig {
    pub window: Duration,
    pub min_samples: usize,
    /// How many served (signature, candidate) score sets to remember.
    pub served_capacity: usize,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            window: Duration::hours(168),
            min_samples: 20,
            served_capacity: 10_000,
        }
    }
}

pub struct FeedbackCollector {
    repository: Arc<dyn FeedbackRepository>,
    weights: Arc<WeightStore>,
    served: ServedScoreLog,
    config: FeedbackConfig,
}

impl FeedbackCollector {
    pub fn new(
        repository: Arc<dyn FeedbackRepository>,
        weights: Arc<WeightStore>,
        config: FeedbackConfig,
    ) -> Self {
        Self {
            repository,
            weights,
            served: ServedScoreLog::new(config.served_capacity),
            config,
        }
    }

    pub fn config(&self) -> &FeedbackConfig {
        &self.config
    }

    /// Keeps the served scores of a search so later feedback can be correlated.
    pub fn remember(&self, set: &RecommendationSet) {
        self.served.remember(set);
    }

    /// Validates and appends one feedback record. Fails only on malformed input
    /// or a storage error.
    pub async fn record(&self, feedback: NewFeedback) -> Result<FeedbackAck, FeedbackError> {
        let candidate_id = feedback.candidate_id.trim().to_string();
        if candidate_id.is_empty() {
            return Err(FeedbackError::Validation(
                "candidate_id cannot be empty".to_string(),
            ));
        }
        if let Some(rating) = feedback.rating {
            if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
                return Err(FeedbackError::Validation(format!(
                    "rating must be between 0 and 5, got {rating}"
                )));
            }
        }
        let free_text_feedback = feedback
            .free_text_feedback
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        if let Some(text) = &free_text_feedback {
            if text.chars().count() > MAX_FREE_TEXT_CHARS {
                return Err(FeedbackError::Validation(format!(
                    "feedback text exceeds {MAX_FREE_TEXT_CHARS} characters"
                )));
            }
        }

        let requirement_signature = match feedback.requirement_signature {
            Some(sig) => {
                let sig = sig.trim().to_ascii_lowercase();
                if sig.len() != 64 || !sig.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(FeedbackError::Validation(
                        "requirement_signature must be a 64-character hex digest".to_string(),
                    ));
                }
                sig
            }
            None => self.served.last_signature().ok_or_else(|| {
                FeedbackError::Validation(
                    "no requirement_signature given and no recent search to attach to".to_string(),
                )
            })?,
        };

        let served = self.served.lookup(&requirement_signature, &candidate_id);
        let entry = FeedbackEntry {
            id: Uuid::new_v4(),
            record: FeedbackRecord {
                requirement_signature,
                candidate_id,
                booking_success: feedback.booking_success,
                rating: feedback.rating,
                free_text_feedback,
                recorded_at: Utc::now(),
            },
            served,
        };

        self.repository.append(&entry).await?;

        debug!(
            feedback_id = %entry.id,
            candidate_id = %entry.record.candidate_id,
            booking_success = entry.record.booking_success,
            correlated = served.is_some(),
            "Feedback recorded"
        );

        Ok(FeedbackAck {
            feedback_id: entry.id,
            requirement_signature: entry.record.requirement_signature,
            recorded_at: entry.record.recorded_at,
            correlated: served.is_some(),
        })
    }

    /// Runs one adaptation cycle over the records in `window` and publishes the
    /// result. `InsufficientFeedback` means the cycle was skipped and the
    /// current vector is untouched.
    pub async fn adjust_weights(&self, window: Duration) -> Result<WeightVector, FeedbackError> {
        let entries = self.repository.since(Utc::now() - window).await?;
        let samples: Vec<Sample> = entries
            .iter()
            .filter_map(|e| {
                e.served.map(|dimensions| Sample {
                    dimensions,
                    outcome: outcome_value(e.record.booking_success, e.record.rating),
                })
            })
            .collect();

        if samples.len() < self.config.min_samples {
            return Err(FeedbackError::InsufficientFeedback {
                samples: samples.len(),
                required: self.config.min_samples,
            });
        }

        let current = self.weights.snapshot();
        let next = adapt(&current.weights, &samples)?;
        if next == current.weights {
            info!(samples = samples.len(), "No correlation signal; weights unchanged");
            return Ok(next);
        }

        let previous = self.weights.publish(next);
        info!(
            samples = samples.len(),
            from_version = previous.version,
            old = ?previous.weights,
            new = ?next,
            "Scoring weights adjusted"
        );
        Ok(next)
    }
}
