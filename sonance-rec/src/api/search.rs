//! Title search endpoint

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::search::{search_titles, SearchHit};
use crate::AppState;

/// Largest accepted search limit
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Query parameters for title search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,

    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub items: Vec<SearchHit>,
}

/// GET /file-recs/search?q=...&limit=...
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    if !(1..=MAX_SEARCH_LIMIT).contains(&query.limit) {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {}, got {}",
            MAX_SEARCH_LIMIT, query.limit
        )));
    }

    let items = search_titles(state.service.store(), &query.q, query.limit);
    Ok(Json(SearchResponse {
        query: query.q,
        items,
    }))
}

/// Build search routes
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/file-recs/search", get(search))
        .route("/search", get(search))
}
