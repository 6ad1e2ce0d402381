use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::middleware::get_metrics;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "genai-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe. The provider is validated at startup, so a serving
/// instance is ready; reports the model it calls.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "status": "ready", "model": state.provider.model() }))
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
