pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::feedback::handlers as feedback;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Taxonomy
        .route("/api/v1/sectors", get(matching::handle_list_sectors))
        .route("/api/v1/sectors/:id", get(matching::handle_get_sector))
        // Matching
        .route("/api/v1/recommendations", post(matching::handle_recommend))
        .route(
            "/api/v1/recommendations/suggest",
            post(matching::handle_suggest),
        )
        .route("/api/v1/jobs/match", post(matching::handle_job_match))
        .route(
            "/api/v1/index/invalidate",
            post(matching::handle_invalidate_index),
        )
        // Feedback loop
        .route("/api/v1/feedback", post(feedback::handle_record_feedback))
        .route("/api/v1/weights", get(feedback::handle_get_weights))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::matching::test_support::candidate;
    use crate::state::test_state;

    async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn search_body() -> Value {
        json!({
            "sector": "oil-gas",
            "training_type": "HSE Induction",
            "preferred_language": "BILINGUAL",
            "format": "hybrid",
            "experience_level": "senior",
            "specific_skills": ["safety"],
            "top_k": 2
        })
    }

    async fn app() -> Router {
        let state = test_state::with_candidates(vec![candidate("a"), candidate("b"), candidate("c")]).await;
        build_router(state)
    }

    #[tokio::test]
    async fn test_health_reports_loaded_index() {
        let (status, body) = call(app().await, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["index"]["candidates"], 3);
    }

    #[tokio::test]
    async fn test_sector_lookup() {
        let app = app().await;
        let (status, body) = call(app.clone(), "GET", "/api/v1/sectors", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["sectors"].as_array().unwrap().len() >= 10);

        let (status, body) = call(app, "GET", "/api/v1/sectors/atlantis", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_recommendations_endpoint() {
        let (status, body) = call(app().await, "POST", "/api/v1/recommendations", Some(search_body())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_found"], 3);
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 2);
        assert_eq!(body["recommendations"][0]["candidate"]["id"], "a");
        assert_eq!(body["recommendations"][0]["matched_skills"], json!(["safety"]));
        assert_eq!(body["degraded"], false);
    }

    #[tokio::test]
    async fn test_bad_enum_is_validation_error() {
        let mut body = search_body();
        body["format"] = json!("carrier-pigeon");
        let (status, body) = call(app().await, "POST", "/api/v1/recommendations", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_field_and_negative_top_k_use_error_envelope() {
        let app = app().await;

        let mut missing = search_body();
        missing.as_object_mut().unwrap().remove("format");
        let (status, body) = call(app.clone(), "POST", "/api/v1/recommendations", Some(missing)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let mut negative = search_body();
        negative["top_k"] = json!(-1);
        let (status, body) = call(app.clone(), "POST", "/api/v1/recommendations", Some(negative)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, body) = call(
            app,
            "POST",
            "/api/v1/feedback",
            Some(json!({ "candidate_id": "a" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_suggest_endpoint() {
        let (status, body) = call(
            app().await,
            "POST",
            "/api/v1/recommendations/suggest",
            Some(json!({ "sector": "oil-gas", "format": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["suggestions"].as_array().unwrap().len(), 3);
        assert_eq!(body["poll_after_secs"], 3);
    }

    #[tokio::test]
    async fn test_job_match_endpoint() {
        let (status, body) = call(
            app().await,
            "POST",
            "/api/v1/jobs/match",
            Some(json!({
                "sector": "oil-gas",
                "title": "Site Safety Lead",
                "required_skills": ["Safety"],
                "format": "IN_PERSON",
                "experience_level": "expert",
                "language": "english",
                "hourly_budget": 100.0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recommendations"][0]["within_budget"], false);
    }

    #[tokio::test]
    async fn test_feedback_after_search_and_weights() {
        let app = app().await;
        let (_, set) = call(app.clone(), "POST", "/api/v1/recommendations", Some(search_body())).await;
        let signature = set["requirement_signature"].as_str().unwrap().to_string();

        let (status, ack) = call(
            app.clone(),
            "POST",
            "/api/v1/feedback",
            Some(json!({ "candidate_id": "a", "booking_success": true, "rating": 4.5 })),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(ack["requirement_signature"], signature);
        assert_eq!(ack["correlated"], true);

        let (status, _) = call(
            app.clone(),
            "POST",
            "/api/v1/feedback",
            Some(json!({ "candidate_id": "a", "booking_success": true, "rating": 9 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, weights) = call(app, "GET", "/api/v1/weights", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(weights["version"], 1);
        assert_eq!(weights["weights"]["sector_weight"], 0.25);
    }

    #[tokio::test]
    async fn test_invalidate_is_accepted() {
        let (status, body) = call(app().await, "POST", "/api/v1/index/invalidate", None).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["status"], "refresh_scheduled");
    }
}
