//! Ranking Service: validate → shortlist → parallel score → sort → truncate.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::Utc;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use tracing::{debug, error, warn};

use crate::matching::error::MatchError;
use crate::matching::index::CandidateIndex;
use crate::matching::scoring::CandidateScorer;
use crate::matching::signature::requirement_signature;
use crate::matching::types::{
    Candidate, MatchBand, MatchScore, Recommendation, RecommendationSet, Requirement,
};
use crate::matching::weights::WeightStore;
use crate::taxonomy::TaxonomyStore;

pub const DEFAULT_TOP_K: usize = 10;

#[derive(Debug, Clone)]
pub struct RankingConfig {
    pub max_top_k: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self { max_top_k: 50 }
    }
}

/// How strictly a requirement is checked before ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Full search: every required field must be present.
    Strict,
    /// Live suggestions: only the sector must resolve.
    Relaxed,
}

/// Builds the bounded scoring pool. `workers == 0` sizes it to available cores.
pub fn build_worker_pool(workers: usize) -> Result<ThreadPool, ThreadPoolBuildError> {
    let workers = if workers == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    } else {
        workers
    };
    ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("match-scorer-{i}"))
        .build()
}

pub struct RankingService {
    taxonomy: Arc<TaxonomyStore>,
    index: Arc<CandidateIndex>,
    weights: Arc<WeightStore>,
    scorer: Arc<dyn CandidateScorer>,
    pool: Arc<ThreadPool>,
    config: RankingConfig,
}

impl RankingService {
    pub fn new(
        taxonomy: Arc<TaxonomyStore>,
        index: Arc<CandidateIndex>,
        weights: Arc<WeightStore>,
        scorer: Arc<dyn CandidateScorer>,
        pool: Arc<ThreadPool>,
        config: RankingConfig,
    ) -> Self {
        Self {
            taxonomy,
            index,
            weights,
            scorer,
            pool,
            config,
        }
    }

    /// Full search. CPU-bound; async callers should run it on a blocking thread.
    pub fn recommend(
        &self,
        requirement: Requirement,
        top_k: usize,
    ) -> Result<RecommendationSet, MatchError> {
        self.rank(requirement, top_k, Validation::Strict)
    }

    pub fn rank(
        &self,
        requirement: Requirement,
        top_k: usize,
        validation: Validation,
    ) -> Result<RecommendationSet, MatchError> {
        self.validate(&requirement, top_k, validation)?;
        let signature = requirement_signature(&requirement);

        let shortlist = match self.index.shortlist(&requirement) {
            Ok(shortlist) => shortlist,
            Err(MatchError::DataUnavailable(reason)) => {
                error!(%reason, sector = %requirement.sector, "Candidate data unavailable; returning degraded empty result");
                return Ok(RecommendationSet::empty(requirement, signature, true));
            }
            Err(other) => return Err(other),
        };

        if shortlist.is_empty() {
            return Ok(RecommendationSet::empty(requirement, signature, false));
        }

        // One weight snapshot for the whole pass.
        let weights = self.weights.snapshot();
        let scorer = self.scorer.as_ref();
        let req = &requirement;

        let mut recommendations: Vec<Recommendation> = self.pool.install(|| {
            (0..shortlist.len())
                .into_par_iter()
                .filter_map(|position| {
                    let candidate = shortlist.get(position)?;
                    match scorer.score(req, candidate, &weights.weights) {
                        Ok(score) => Some(annotate(req, candidate, score)),
                        Err(e) => {
                            warn!(error = %e, candidate_id = %candidate.id, "Skipping candidate that could not be scored");
                            None
                        }
                    }
                })
                .collect()
        });

        recommendations.sort_by(compare_recommendations);
        let total_found = recommendations.len();
        recommendations.truncate(top_k);

        debug!(
            sector = %requirement.sector,
            index_version = shortlist.snapshot_version(),
            shortlisted = shortlist.len(),
            total_found,
            returned = recommendations.len(),
            weights_version = weights.version,
            scorer = scorer.backend(),
            "Ranking pass complete"
        );

        Ok(RecommendationSet {
            requirement,
            requirement_signature: signature,
            total_found,
            recommendations,
            generated_at: Utc::now(),
            degraded: false,
        })
    }

    fn validate(
        &self,
        requirement: &Requirement,
        top_k: usize,
        validation: Validation,
    ) -> Result<(), MatchError> {
        if !self.taxonomy.contains(&requirement.sector) {
            return Err(MatchError::Validation(format!(
                "unknown sector '{}'",
                requirement.sector
            )));
        }
        if validation == Validation::Strict && requirement.training_type.trim().is_empty() {
            return Err(MatchError::Validation(
                "training_type cannot be empty".to_string(),
            ));
        }
        if top_k == 0 || top_k > self.config.max_top_k {
            return Err(MatchError::Validation(format!(
                "top_k must be between 1 and {}",
                self.config.max_top_k
            )));
        }
        if let Some(budget) = requirement.budget_per_hour {
            if !budget.is_finite() || budget < 0.0 {
                return Err(MatchError::Validation(
                    "budget_per_hour must be a non-negative number".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Total order for recommendations: overall score desc, rating desc, candidate id asc.
pub fn compare_recommendations(a: &Recommendation, b: &Recommendation) -> Ordering {
    b.score
        .overall_score
        .total_cmp(&a.score.overall_score)
        .then_with(|| b.candidate.rating.total_cmp(&a.candidate.rating))
        .then_with(|| a.candidate.id.cmp(&b.candidate.id))
}

fn annotate(requirement: &Requirement, candidate: &Candidate, score: MatchScore) -> Recommendation {
    Recommendation {
        candidate: candidate.clone(),
        band: MatchBand::from_score(score.overall_score),
        matched_skills: matched_skills(requirement, candidate),
        within_budget: within_budget(requirement, candidate),
        score,
    }
}

/// Requirement skills (original spelling) found case-insensitively in the
/// candidate's tags or certifications.
pub fn matched_skills(requirement: &Requirement, candidate: &Candidate) -> Vec<String> {
    let haystack: Vec<String> = candidate
        .expertise_tags
        .iter()
        .chain(candidate.certifications.iter())
        .map(|t| t.to_lowercase())
        .collect();

    requirement
        .specific_skills
        .iter()
        .filter(|skill| {
            let needle = skill.trim().to_lowercase();
            !needle.is_empty() && haystack.iter().any(|h| h.contains(&needle))
        })
        .cloned()
        .collect()
}

pub fn within_budget(requirement: &Requirement, candidate: &Candidate) -> Option<bool> {
    match (requirement.budget_per_hour, candidate.rate_per_hour) {
        (Some(budget), Some(rate)) => Some(rate <= budget),
        _ => None,
    }
}
