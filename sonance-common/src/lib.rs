//! # Sonance Common Library
//!
//! Shared code for the Sonance recommendation binaries:
//! - Error types
//! - Bootstrap configuration loading (CLI > env > TOML > defaults)
//! - Recommendation tuning parameters
//! - Track reference normalization

pub mod config;
pub mod error;
pub mod params;
pub mod track_id;

pub use error::{Error, Result};
pub use params::RecommendParams;
pub use track_id::normalize_track_id;
