use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::Value;

use crate::api::HealthApi;
use crate::routes::AppState;

/// Health check endpoint.
///
/// Returns a simple JSON response indicating the server is running.
pub async fn health_check() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "facturia-dashboard",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Backend health check endpoint.
///
/// Forwards to the invoice backend's own health route.
pub async fn backend_health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let backend = state.api.health().await.map_err(|e| {
        tracing::error!("Backend health check failed: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "backend": backend
    })))
}

/// Backend system metrics, passed through unchanged.
pub async fn backend_metrics(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    state.api.system_metrics().await.map(Json).map_err(|e| {
        tracing::error!("Backend metrics failed: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })
}
