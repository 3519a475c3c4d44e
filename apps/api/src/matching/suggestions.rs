//! Live Suggestion Stream: a small top-N preview while a requirement is drafted.
//!
//! Clients poll; each call is an independent, side-effect free ranking pass.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::error::MatchError;
use crate::matching::ranking::{RankingService, Validation};
use crate::matching::types::{
    DeliveryFormat, ExperienceLevel, PreferredLanguage, Requirement, SectorId,
};

pub const SUGGESTION_COUNT: usize = 3;

/// A requirement still being edited. Only the sector is known for sure.
#[derive(Debug, Clone, Default)]
pub struct PartialRequirement {
    pub sector: SectorId,
    pub training_type: Option<String>,
    pub preferred_language: Option<PreferredLanguage>,
    pub format: Option<DeliveryFormat>,
    pub experience_level: Option<ExperienceLevel>,
    pub budget_per_hour: Option<f64>,
    pub specific_skills: BTreeSet<String>,
    pub location: Option<String>,
}

impl PartialRequirement {
    /// Fills the gaps: English, online, intermediate.
    pub fn complete(self) -> Requirement {
        Requirement {
            sector: self.sector,
            training_type: self.training_type.unwrap_or_default(),
            preferred_language: self.preferred_language.unwrap_or(PreferredLanguage::English),
            format: self.format.unwrap_or(DeliveryFormat::Online),
            experience_level: self
                .experience_level
                .unwrap_or(ExperienceLevel::Intermediate),
            budget_per_hour: self.budget_per_hour,
            timeframe: None,
            specific_skills: self.specific_skills,
            location: self.location.filter(|l| !l.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub candidate_id: String,
    pub name: String,
    pub title: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionBatch {
    pub suggestions: Vec<Suggestion>,
    pub total_found: usize,
    /// Cadence hint for the next poll.
    pub poll_after_secs: u64,
    pub generated_at: DateTime<Utc>,
}

pub struct SuggestionService {
    ranking: Arc<RankingService>,
    poll_after_secs: u64,
}

impl SuggestionService {
    pub fn new(ranking: Arc<RankingService>, poll_after_secs: u64) -> Self {
        Self {
            ranking,
            poll_after_secs,
        }
    }

    pub fn suggest(&self, partial: PartialRequirement) -> Result<SuggestionBatch, MatchError> {
        let set = self
            .ranking
            .rank(partial.complete(), SUGGESTION_COUNT, Validation::Relaxed)?;

        let suggestions = set
            .recommendations
            .into_iter()
            .map(|r| Suggestion {
                candidate_id: r.candidate.id,
                name: r.candidate.name,
                title: r.candidate.title,
                score: r.score.overall_score,
            })
            .collect();

        Ok(SuggestionBatch {
            suggestions,
            total_found: set.total_found,
            poll_after_secs: self.poll_after_secs,
            generated_at: set.generated_at,
        })
    }
}
