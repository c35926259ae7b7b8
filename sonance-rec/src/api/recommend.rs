//! Recommendation endpoints
//!
//! Pipeline work is CPU-bound, so it runs on the blocking pool rather than
//! on the async worker threads.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::search::search_titles;
use crate::service::Recommendation;
use crate::AppState;

/// Largest accepted k
pub const MAX_K: usize = 100;

/// Number of title-search suggestions for an unknown seed
const SUGGESTION_LIMIT: usize = 5;

/// Query parameters for single-seed recommendations
#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    /// Seed reference: bare id, catalog URI or web URL
    pub track_id: String,

    #[serde(default = "default_k")]
    pub k: usize,

    #[serde(default = "default_bucket_bias")]
    pub bucket_bias: f32,

    /// Required tag, also accepted as `genre_only`
    #[serde(default, alias = "genre_only")]
    pub tag: Option<String>,
}

/// Query parameters for multi-seed recommendations
#[derive(Debug, Deserialize)]
pub struct MultiRecommendQuery {
    /// Comma separated seed references
    pub track_ids: String,

    #[serde(default = "default_k")]
    pub k: usize,

    #[serde(default = "default_bucket_bias")]
    pub bucket_bias: f32,

    #[serde(default, alias = "genre_only")]
    pub tag: Option<String>,
}

fn default_k() -> usize {
    25
}

fn default_bucket_bias() -> f32 {
    1.0
}

/// Single-seed response
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub query_id: String,
    pub items: Vec<Recommendation>,
}

/// Multi-seed response
#[derive(Debug, Serialize)]
pub struct MultiRecommendResponse {
    pub seed_ids: Vec<String>,
    pub items: Vec<Recommendation>,
}

fn validate(k: usize, bucket_bias: f32) -> ApiResult<()> {
    if !(1..=MAX_K).contains(&k) {
        return Err(ApiError::BadRequest(format!("k must be between 1 and {}, got {}", MAX_K, k)));
    }
    if !bucket_bias.is_finite() {
        return Err(ApiError::BadRequest(format!("bucket_bias must be finite, got {}", bucket_bias)));
    }
    Ok(())
}

/// GET /file-recs/recommend?track_id=...&k=...&bucket_bias=...&tag=...
///
/// An empty result means the seed is unknown (or has no neighbors left after
/// filtering); the 400 response carries title matches for the raw reference.
pub async fn recommend(
    State(state): State<AppState>,
    Query(query): Query<RecommendQuery>,
) -> ApiResult<Json<RecommendResponse>> {
    validate(query.k, query.bucket_bias)?;

    let service = state.service.clone();
    let track_id = query.track_id.clone();
    let tag = query.tag.clone();
    let items = tokio::task::spawn_blocking(move || {
        service.recommend_single(&track_id, query.k, query.bucket_bias, tag.as_deref())
    })
    .await
    .map_err(|e| ApiError::Internal(format!("recommendation task failed: {}", e)))?;

    if items.is_empty() {
        let suggestions = search_titles(state.service.store(), &query.track_id, SUGGESTION_LIMIT);
        info!(
            "No recommendations for '{}', returning {} suggestions",
            query.track_id,
            suggestions.len()
        );
        return Err(ApiError::UnknownSeed {
            track_id: query.track_id,
            suggestions,
        });
    }

    Ok(Json(RecommendResponse {
        query_id: query.track_id,
        items,
    }))
}

/// GET /file-recs/recommend-multi?track_ids=a,b,c&k=...&bucket_bias=...&tag=...
pub async fn recommend_multi(
    State(state): State<AppState>,
    Query(query): Query<MultiRecommendQuery>,
) -> ApiResult<Json<MultiRecommendResponse>> {
    validate(query.k, query.bucket_bias)?;

    let seed_ids: Vec<String> = query
        .track_ids
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if seed_ids.is_empty() {
        return Err(ApiError::BadRequest("track_ids must name at least one track".to_string()));
    }

    let service = state.service.clone();
    let seeds = seed_ids.clone();
    let tag = query.tag.clone();
    let items = tokio::task::spawn_blocking(move || {
        service.recommend_multi(seeds.as_slice(), query.k, query.bucket_bias, tag.as_deref())
    })
    .await
    .map_err(|e| ApiError::Internal(format!("recommendation task failed: {}", e)))?;

    Ok(Json(MultiRecommendResponse { seed_ids, items }))
}

/// Build recommendation routes
pub fn recommend_routes() -> Router<AppState> {
    Router::new()
        .route("/file-recs/recommend", get(recommend))
        .route("/recommend", get(recommend))
        .route("/file-recs/recommend-multi", get(recommend_multi))
        .route("/recommend-multi", get(recommend_multi))
}
