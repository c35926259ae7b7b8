//! Retrieval and reranking stages
//!
//! Stage order for every request:
//! retrieve (wide recall) → profile → era filter → bucket sampler → rerank
//! → tag filter → truncate to k.
//!
//! Candidate lists carry unique ids throughout; no stage reintroduces a
//! removed id or duplicates one.

pub mod era;
pub mod profile;
pub mod rerank;
pub mod retriever;
pub mod sampler;

pub use era::filter_by_era;
pub use profile::{build_profile, Profile};
pub use rerank::{demote_repeated_artists, filter_by_tag, pop_closeness, rerank, year_prior};
pub use retriever::{search, search_excluding};
pub use sampler::sample_by_bucket;

/// A track id with its current score
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub score: f32,
}

impl Candidate {
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}
