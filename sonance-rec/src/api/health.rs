//! Health check endpoints

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Service health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub mode: String,
}

/// Recommender readiness response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    /// True once a non-empty store is loaded
    pub ready: bool,
    pub tracks: usize,
    pub dim: usize,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "sonance-rec".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mode: "file-backed".to_string(),
    })
}

/// GET /file-recs/health
pub async fn readiness(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let store = state.service.store();
    Json(ReadinessResponse {
        status: "ok".to_string(),
        ready: !store.is_empty(),
        tracks: store.len(),
        dim: store.dim(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/file-recs/health", get(readiness))
}
