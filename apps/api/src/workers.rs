//! Background tasks: index refresh and the weight adaptation cycle.

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::feedback::{FeedbackCollector, FeedbackError};
use crate::matching::index::CandidateIndex;

/// Reloads the candidate index every refresh interval, or sooner when someone
/// calls `invalidate`. A failed refresh keeps the previous snapshot.
pub fn spawn_index_refresher(index: Arc<CandidateIndex>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = index.config().refresh_interval;
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_secs = period.as_secs(), "Index refresher started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = index.invalidated() => {
                    info!("Index invalidated; refreshing early");
                    ticker.reset();
                }
            }
            if let Err(e) = index.refresh().await {
                warn!(error = %e, "Scheduled index refresh failed; serving previous snapshot");
            }
        }
    })
}

/// Runs one adaptation cycle per `period` over the configured feedback window.
pub fn spawn_weight_adjuster(feedback: Arc<FeedbackCollector>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let window: ChronoDuration = feedback.config().window;
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_secs = period.as_secs(), "Weight adjuster started");

        loop {
            ticker.tick().await;
            match feedback.adjust_weights(window).await {
                Ok(_) => {}
                Err(FeedbackError::InsufficientFeedback { samples, required }) => {
                    info!(samples, required, "Skipping weight adjustment: not enough feedback");
                }
                Err(e) => {
                    error!(error = %e, "Weight adjustment failed; keeping previous weights");
                }
            }
        }
    })
}
