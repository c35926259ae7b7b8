//! Brute-force cosine nearest-neighbor search
//!
//! Stored rows and queries are unit length, so cosine similarity is a plain
//! dot product. Scores for the whole catalog come from one pass over the
//! dense matrix; only the top `k` rows are then ordered.
//!
//! Ordering: descending score, ties broken by ascending row index.

use super::Candidate;
use crate::store::VectorStore;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::warn;

/// Dot product of every matrix row with `query`
pub fn score_all(store: &VectorStore, query: &[f32]) -> Vec<f32> {
    store
        .matrix()
        .chunks_exact(store.dim())
        .map(|row| row.iter().zip(query).map(|(a, b)| a * b).sum())
        .collect()
}

/// The `top_k` rows most similar to `query`, best first
///
/// `top_k` is clamped to the catalog size. A query of the wrong dimension
/// yields no candidates.
pub fn search(store: &VectorStore, query: &[f32], top_k: usize) -> Vec<Candidate> {
    if query.len() != store.dim() {
        warn!(
            "Query dimension {} does not match store dimension {}",
            query.len(),
            store.dim()
        );
        return Vec::new();
    }

    let scores = score_all(store, query);
    let k = top_k.min(scores.len());
    if k == 0 {
        return Vec::new();
    }

    let by_rank = |a: &usize, b: &usize| -> Ordering {
        scores[*b].total_cmp(&scores[*a]).then_with(|| a.cmp(b))
    };

    let mut rows: Vec<usize> = (0..scores.len()).collect();
    if k < rows.len() {
        rows.select_nth_unstable_by(k - 1, by_rank);
        rows.truncate(k);
    }
    rows.sort_unstable_by(by_rank);

    rows.into_iter()
        .map(|row| Candidate::new(store.id_at(row), scores[row]))
        .collect()
}

/// Like [`search`], with `exclude` ids removed before truncating to `top_k`
pub fn search_excluding(
    store: &VectorStore,
    query: &[f32],
    top_k: usize,
    exclude: &HashSet<&str>,
) -> Vec<Candidate> {
    let mut candidates = search(store, query, top_k.saturating_add(exclude.len()));
    candidates.retain(|c| !exclude.contains(c.id.as_str()));
    candidates.truncate(top_k);
    candidates
}
