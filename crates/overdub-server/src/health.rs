use axum::{Json, response::IntoResponse};
use http::StatusCode;
use serde_json::json;

/// Liveness probe; answers without touching storage or the media toolkit
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
