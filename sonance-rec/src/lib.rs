//! sonance-rec library - track recommendation service
//!
//! Retrieval-and-reranking over an immutable in-memory vector index:
//! nearest-neighbor recall, era-aware filtering, popularity-balanced
//! shortlisting and reranking with soft priors plus artist diversity.

pub mod api;
pub mod error;
pub mod pipeline;
pub mod search;
pub mod service;
pub mod store;

pub use crate::error::{ApiError, ApiResult};
pub use crate::service::{Recommendation, RecommendationService};
pub use crate::store::VectorStore;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Recommendation service over the loaded store
    pub service: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(service: Arc<RecommendationService>) -> Self {
        Self { service }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::buildinfo_routes())
        .merge(api::search_routes())
        .merge(api::recommend_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
