use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration as ChronoDuration;

use crate::config::Config;
use crate::feedback::repository::FeedbackRepository;
use crate::feedback::{FeedbackCollector, FeedbackConfig};
use crate::matching::index::{CandidateIndex, IndexConfig};
use crate::matching::profiles::ProfileStore;
use crate::matching::ranking::{build_worker_pool, RankingConfig, RankingService};
use crate::matching::scoring::{CandidateScorer, HeuristicScorer};
use crate::matching::suggestions::SuggestionService;
use crate::matching::weights::WeightStore;
use crate::taxonomy::TaxonomyStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub taxonomy: Arc<TaxonomyStore>,
    pub index: Arc<CandidateIndex>,
    pub weights: Arc<WeightStore>,
    pub ranking: Arc<RankingService>,
    pub suggestions: Arc<SuggestionService>,
    pub feedback: Arc<FeedbackCollector>,
}

impl AppState {
    /// Wires the engine around the given stores. The index starts unloaded;
    /// the caller decides when to run the first refresh.
    pub fn build(
        config: Config,
        taxonomy: TaxonomyStore,
        profiles: Arc<dyn ProfileStore>,
        feedback_repository: Arc<dyn FeedbackRepository>,
    ) -> Result<Self> {
        let taxonomy = Arc::new(taxonomy);
        let weights = Arc::new(WeightStore::default());

        let index = Arc::new(CandidateIndex::new(
            profiles,
            IndexConfig {
                refresh_interval: config.index_refresh_interval,
                max_shortlist: config.max_shortlist,
            },
        ));

        // Pluggable scorer. Default: HeuristicScorer.
        let scorer: Arc<dyn CandidateScorer> = Arc::new(HeuristicScorer::new(Arc::clone(&taxonomy)));
        let pool = build_worker_pool(config.match_workers).context("Failed to build scoring pool")?;

        let ranking = Arc::new(RankingService::new(
            Arc::clone(&taxonomy),
            Arc::clone(&index),
            Arc::clone(&weights),
            scorer,
            Arc::new(pool),
            RankingConfig {
                max_top_k: config.max_top_k,
            },
        ));
        let suggestions = Arc::new(SuggestionService::new(
            Arc::clone(&ranking),
            config.suggest_poll_secs,
        ));
        let feedback = Arc::new(FeedbackCollector::new(
            feedback_repository,
            Arc::clone(&weights),
            FeedbackConfig {
                window: ChronoDuration::hours(config.feedback_window_hours),
                min_samples: config.feedback_min_samples,
                ..FeedbackConfig::default()
            },
        ));

        Ok(AppState {
            config,
            taxonomy,
            index,
            weights,
            ranking,
            suggestions,
            feedback,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_state {
    use super::*;
    use crate::feedback::repository::InMemoryFeedbackRepository;
    use crate::matching::profiles::StaticProfileStore;
    use crate::matching::types::Candidate;

    /// In-memory state with the index already loaded from `candidates`.
    pub async fn with_candidates(candidates: Vec<Candidate>) -> AppState {
        let config = Config::from_lookup(|key| match key {
            "PROFILES_PATH" => Some("unused.json".to_string()),
            "MATCH_WORKERS" => Some("2".to_string()),
            _ => None,
        })
        .unwrap();
        let state = AppState::build(
            config,
            TaxonomyStore::builtin().unwrap(),
            Arc::new(StaticProfileStore::new(candidates)),
            Arc::new(InMemoryFeedbackRepository::new()),
        )
        .unwrap();
        state.index.refresh().await.unwrap();
        state
    }
}
