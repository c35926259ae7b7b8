//! Build identification endpoint

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Version and build metadata captured by build.rs
#[derive(Debug, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            git_hash: env!("GIT_HASH"),
            build_timestamp: env!("BUILD_TIMESTAMP"),
            build_profile: env!("BUILD_PROFILE"),
        }
    }
}

/// GET /file-recs/buildinfo
pub async fn get_build_info() -> Json<BuildInfo> {
    Json(BuildInfo::current())
}

/// Build identification routes
pub fn buildinfo_routes() -> Router<AppState> {
    Router::new().route("/file-recs/buildinfo", get(get_build_info))
}
