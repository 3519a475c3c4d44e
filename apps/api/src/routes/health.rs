use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus candidate index freshness.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.index.snapshot();
    let status = if !snapshot.is_loaded() {
        "degraded"
    } else if state.index.is_stale(&snapshot) {
        "stale"
    } else {
        "ok"
    };

    Json(json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "service": "talentmatch-api",
        "index": {
            "version": snapshot.version,
            "candidates": snapshot.len(),
            "age_secs": snapshot.age().map(|a| a.as_secs()),
            "refresh_interval_secs": state.config.index_refresh_interval.as_secs(),
        },
        "weights_version": state.weights.snapshot().version,
    }))
}
