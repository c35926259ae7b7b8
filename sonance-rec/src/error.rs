//! Error types for sonance-rec HTTP handlers

use crate::search::SearchHit;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request parameter (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Seed reference not in the catalog (400), with title-search suggestions
    #[error("Unknown or cold track_id: {track_id}")]
    UnknownSeed {
        track_id: String,
        suggestions: Vec<SearchHit>,
    },

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match self {
            ApiError::BadRequest(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": { "code": "BAD_REQUEST", "message": message } }),
            ),
            ApiError::UnknownSeed { suggestions, .. } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": {
                        "code": "UNKNOWN_TRACK",
                        "message": message,
                        "suggestions": suggestions,
                    }
                }),
            ),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": { "code": "INTERNAL_ERROR", "message": message } }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn render(error: ApiError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_error_status_and_codes() {
        let (status, body) = render(ApiError::BadRequest("k out of range".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");

        let (status, body) = render(ApiError::UnknownSeed {
            track_id: "zzz".to_string(),
            suggestions: Vec::new(),
        })
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "UNKNOWN_TRACK");
        assert!(body["error"]["suggestions"].as_array().unwrap().is_empty());

        let (status, body) = render(ApiError::Internal("task panicked".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], "Internal server error: task panicked");
    }
}
