//! HTTP API handlers
//!
//! Thin layer over [`crate::service::RecommendationService`]: parameter
//! validation, JSON shaping, and mapping of empty results to suggestions.

pub mod buildinfo;
pub mod health;
pub mod recommend;
pub mod search;

pub use buildinfo::buildinfo_routes;
pub use health::health_routes;
pub use recommend::recommend_routes;
pub use search::search_routes;
