//! Axum route handlers for the Matching API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::error::MatchError;
use crate::matching::jobs::JobPosting;
use crate::matching::ranking::DEFAULT_TOP_K;
use crate::matching::suggestions::{PartialRequirement, SuggestionBatch};
use crate::matching::types::{RecommendationSet, Requirement};
use crate::state::AppState;
use crate::taxonomy::Sector;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Enum fields arrive as strings and are parsed here, so a bad value is a 400
/// with a readable message. Bodies that fail to deserialize at all (missing
/// field, negative `top_k`) are mapped to the same 400 by `AppError`.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub sector: String,
    pub training_type: String,
    pub preferred_language: String,
    pub format: String,
    pub experience_level: String,
    #[serde(default)]
    pub budget_per_hour: Option<f64>,
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub specific_skills: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl SearchRequest {
    fn into_requirement(self) -> Result<(Requirement, usize), MatchError> {
        let requirement = Requirement {
            sector: self.sector.trim().to_string(),
            training_type: self.training_type,
            preferred_language: self.preferred_language.parse()?,
            format: self.format.parse()?,
            experience_level: self.experience_level.parse()?,
            budget_per_hour: self.budget_per_hour,
            timeframe: self.timeframe.filter(|t| !t.trim().is_empty()),
            specific_skills: self
                .specific_skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            location: self.location.filter(|l| !l.trim().is_empty()),
        };
        Ok((requirement, self.top_k.unwrap_or(DEFAULT_TOP_K)))
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub sector: String,
    #[serde(default)]
    pub training_type: Option<String>,
    #[serde(default)]
    pub preferred_language: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub budget_per_hour: Option<f64>,
    #[serde(default)]
    pub specific_skills: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl SuggestRequest {
    fn into_partial(self) -> Result<PartialRequirement, MatchError> {
        // Half-typed drafts: blank strings count as "not chosen yet".
        fn chosen(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        Ok(PartialRequirement {
            sector: self.sector.trim().to_string(),
            training_type: chosen(self.training_type),
            preferred_language: chosen(self.preferred_language)
                .map(|v| v.parse())
                .transpose()?,
            format: chosen(self.format).map(|v| v.parse()).transpose()?,
            experience_level: chosen(self.experience_level)
                .map(|v| v.parse())
                .transpose()?,
            budget_per_hour: self.budget_per_hour,
            specific_skills: self
                .specific_skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            location: chosen(self.location),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct JobMatchRequest {
    pub sector: String,
    pub title: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub format: String,
    pub experience_level: String,
    pub language: String,
    #[serde(default)]
    pub hourly_budget: Option<f64>,
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl JobMatchRequest {
    fn into_posting(self) -> Result<(JobPosting, usize), MatchError> {
        let posting = JobPosting {
            sector: self.sector.trim().to_string(),
            title: self.title,
            required_skills: self.required_skills,
            location: self.location,
            format: self.format.parse()?,
            experience_level: self.experience_level.parse()?,
            language: self.language.parse()?,
            hourly_budget: self.hourly_budget,
        };
        Ok((posting, self.top_k.unwrap_or(DEFAULT_TOP_K)))
    }
}

#[derive(Debug, Serialize)]
pub struct SectorsResponse {
    pub sectors: Vec<Sector>,
}

#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    pub status: &'static str,
    pub index_version: u64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sectors
pub async fn handle_list_sectors(State(state): State<AppState>) -> Json<SectorsResponse> {
    Json(SectorsResponse {
        sectors: state.taxonomy.list_sectors().to_vec(),
    })
}

/// GET /api/v1/sectors/:id
pub async fn handle_get_sector(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Sector>, AppError> {
    Ok(Json(state.taxonomy.get_sector(&id)?.clone()))
}

/// POST /api/v1/recommendations
///
/// Full ranked search. Served scores are remembered so later feedback can be
/// correlated with them.
pub async fn handle_recommend(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<RecommendationSet>, AppError> {
    let Json(request) = payload?;
    let (requirement, top_k) = request.into_requirement()?;
    let set = run_ranking(&state, requirement, top_k).await?;
    state.feedback.remember(&set);
    Ok(Json(set))
}

/// POST /api/v1/recommendations/suggest
///
/// Top-3 preview for a requirement still being drafted. Poll at `poll_after_secs`.
pub async fn handle_suggest(
    State(state): State<AppState>,
    payload: Result<Json<SuggestRequest>, JsonRejection>,
) -> Result<Json<SuggestionBatch>, AppError> {
    let Json(request) = payload?;
    let partial = request.into_partial()?;
    let suggestions = state.suggestions.clone();
    let batch = tokio::task::spawn_blocking(move || suggestions.suggest(partial))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;
    Ok(Json(batch))
}

/// POST /api/v1/jobs/match
///
/// Ranks candidates against a job posting through the same engine.
pub async fn handle_job_match(
    State(state): State<AppState>,
    payload: Result<Json<JobMatchRequest>, JsonRejection>,
) -> Result<Json<RecommendationSet>, AppError> {
    let Json(request) = payload?;
    let (posting, top_k) = request.into_posting()?;
    let set = run_ranking(&state, Requirement::from(posting), top_k).await?;
    state.feedback.remember(&set);
    Ok(Json(set))
}

/// POST /api/v1/index/invalidate
///
/// Asks the background refresher to reload profiles now. Returns immediately.
pub async fn handle_invalidate_index(
    State(state): State<AppState>,
) -> (StatusCode, Json<InvalidateResponse>) {
    state.index.invalidate();
    (
        StatusCode::ACCEPTED,
        Json(InvalidateResponse {
            status: "refresh_scheduled",
            index_version: state.index.snapshot().version,
        }),
    )
}

/// Scoring is CPU-bound; keep it off the async workers.
async fn run_ranking(
    state: &AppState,
    requirement: Requirement,
    top_k: usize,
) -> Result<RecommendationSet, AppError> {
    let ranking = state.ranking.clone();
    let set = tokio::task::spawn_blocking(move || ranking.recommend(requirement, top_k))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;
    Ok(set)
}
