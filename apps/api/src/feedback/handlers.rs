//! Axum route handlers for the Feedback API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::feedback::models::{FeedbackAck, NewFeedback};
use crate::matching::weights::WeightSnapshot;
use crate::state::AppState;

/// POST /api/v1/feedback
///
/// Appends one outcome record. Without `requirement_signature` it attaches to
/// the most recent search served by this instance.
pub async fn handle_record_feedback(
    State(state): State<AppState>,
    payload: Result<Json<NewFeedback>, JsonRejection>,
) -> Result<(StatusCode, Json<FeedbackAck>), AppError> {
    let Json(request) = payload?;
    let ack = state.feedback.record(request).await?;
    Ok((StatusCode::ACCEPTED, Json(ack)))
}

/// GET /api/v1/weights
///
/// The weight vector currently used for scoring, read-only.
pub async fn handle_get_weights(State(state): State<AppState>) -> Json<WeightSnapshot> {
    Json(state.weights.snapshot().as_ref().clone())
}
