use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::feedback::models::{FeedbackEntry, FeedbackRecord};
use crate::matching::types::DimensionScores;

/// Row of the append-only `match_feedback` table.
#[derive(Debug, Clone, FromRow)]
pub struct MatchFeedbackRow {
    pub id: Uuid,
    pub requirement_signature: String,
    pub candidate_id: String,
    pub booking_success: bool,
    pub rating: Option<f64>,
    pub free_text_feedback: Option<String>,
    pub served_scores: Option<Json<DimensionScores>>,
    pub recorded_at: DateTime<Utc>,
}

impl From<MatchFeedbackRow> for FeedbackEntry {
    fn from(row: MatchFeedbackRow) -> Self {
        FeedbackEntry {
            id: row.id,
            record: FeedbackRecord {
                requirement_signature: row.requirement_signature,
                candidate_id: row.candidate_id,
                booking_success: row.booking_success,
                rating: row.rating,
                free_text_feedback: row.free_text_feedback,
                recorded_at: row.recorded_at,
            },
            served: row.served_scores.map(|Json(scores)| scores),
        }
    }
}
