//! Append-only storage for feedback entries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::feedback::error::FeedbackError;
use crate::feedback::models::FeedbackEntry;
use crate::models::feedback::MatchFeedbackRow;

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn append(&self, entry: &FeedbackEntry) -> Result<(), FeedbackError>;

    /// Entries recorded at or after `cutoff`, oldest first.
    async fn since(&self, cutoff: DateTime<Utc>) -> Result<Vec<FeedbackEntry>, FeedbackError>;
}

#[derive(Default)]
pub struct InMemoryFeedbackRepository {
    entries: RwLock<Vec<FeedbackEntry>>,
}

impl InMemoryFeedbackRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn append(&self, entry: &FeedbackEntry) -> Result<(), FeedbackError> {
        self.entries.write().push(entry.clone());
        Ok(())
    }

    async fn since(&self, cutoff: DateTime<Utc>) -> Result<Vec<FeedbackEntry>, FeedbackError> {
        let mut out: Vec<FeedbackEntry> = self
            .entries
            .read()
            .iter()
            .filter(|e| e.record.recorded_at >= cutoff)
            .cloned()
            .collect();
        out.sort_by_key(|e| e.record.recorded_at);
        Ok(out)
    }
}

pub struct PgFeedbackRepository {
    pool: PgPool,
}

impl PgFeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackRepository for PgFeedbackRepository {
    async fn append(&self, entry: &FeedbackEntry) -> Result<(), FeedbackError> {
        sqlx::query(
            r#"
            INSERT INTO match_feedback
                (id, requirement_signature, candidate_id, booking_success, rating,
                 free_text_feedback, served_scores, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id)
        .bind(&entry.record.requirement_signature)
        .bind(&entry.record.candidate_id)
        .bind(entry.record.booking_success)
        .bind(entry.record.rating)
        .bind(&entry.record.free_text_feedback)
        .bind(entry.served.map(Json))
        .bind(entry.record.recorded_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn since(&self, cutoff: DateTime<Utc>) -> Result<Vec<FeedbackEntry>, FeedbackError> {
        let rows = sqlx::query_as::<_, MatchFeedbackRow>(
            r#"
            SELECT id, requirement_signature, candidate_id, booking_success, rating,
                   free_text_feedback, served_scores, recorded_at
            FROM match_feedback
            WHERE recorded_at >= $1
            ORDER BY recorded_at ASC
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FeedbackEntry::from).collect())
    }
}
