//! Professional Profile Store: the external, read-only source of candidates.
//!
//! The engine only ever lists profiles; it never writes back.

use std::path::Path;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::matching::types::Candidate;
use crate::models::profile::ProfessionalRow;

#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error("Profile database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to read profiles file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse profiles file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn list_candidates(&self) -> Result<Vec<Candidate>, ProfileStoreError>;
}

/// Fixed in-memory profile set, loaded from a JSON file or built directly.
pub struct StaticProfileStore {
    candidates: Vec<Candidate>,
}

impl StaticProfileStore {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ProfileStoreError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&raw)?))
    }
}

#[async_trait]
impl ProfileStore for StaticProfileStore {
    async fn list_candidates(&self) -> Result<Vec<Candidate>, ProfileStoreError> {
        Ok(self.candidates.clone())
    }
}

/// Reads the `professionals` table.
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn list_candidates(&self) -> Result<Vec<Candidate>, ProfileStoreError> {
        let rows = sqlx::query_as::<_, ProfessionalRow>(
            r#"
            SELECT id, name, title, location, years_experience, rate_per_hour, rating,
                   languages, formats_supported, expertise_tags, certifications,
                   sector_affinity, updated_at
            FROM professionals
            WHERE is_active = TRUE
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Candidate::from).collect())
    }
}
