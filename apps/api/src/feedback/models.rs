use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::types::DimensionScores;

/// Post-engagement outcome for one (requirement, candidate) pair. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub requirement_signature: String,
    pub candidate_id: String,
    pub booking_success: bool,
    /// 0–5 when present.
    pub rating: Option<f64>,
    pub free_text_feedback: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// A stored record plus the dimension scores the candidate was served with,
/// when the collector still remembered them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub id: Uuid,
    pub record: FeedbackRecord,
    pub served: Option<DimensionScores>,
}

/// Feedback as submitted, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewFeedback {
    /// Falls back to the most recent search when omitted.
    #[serde(default)]
    pub requirement_signature: Option<String>,
    pub candidate_id: String,
    pub booking_success: bool,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, alias = "feedback")]
    pub free_text_feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackAck {
    pub feedback_id: Uuid,
    pub requirement_signature: String,
    pub recorded_at: DateTime<Utc>,
    /// False when no served scores were found; the record is kept but does not
    /// take part in weight adaptation.
    pub correlated: bool,
}
