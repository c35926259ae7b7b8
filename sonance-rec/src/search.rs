//! Title search over the metadata catalog
//!
//! Substring matches first; when those do not fill the limit, fuzzy matches
//! by normalized Levenshtein similarity are appended. Used for autocomplete
//! and for suggestions when a seed cannot be resolved.

use crate::store::VectorStore;
use serde::Serialize;
use std::collections::HashSet;

/// Minimum normalized Levenshtein similarity for a fuzzy hit
pub const FUZZY_CUTOFF: f64 = 0.6;

/// Search result payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub title: Option<String>,
    pub artists: Vec<String>,
    pub year: Option<i32>,
    pub pop_bucket: Option<u8>,
}

/// Tracks whose title matches `query`, at most `limit`
pub fn search_titles(store: &VectorStore, query: &str, limit: usize) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }
    let index = store.title_index();

    let mut hits: Vec<&str> = index
        .iter()
        .filter(|(title, _)| title.contains(&needle))
        .map(|(_, id)| id.as_str())
        .collect();

    if hits.len() < limit {
        let mut fuzzy: Vec<(f64, &str)> = index
            .iter()
            .map(|(title, id)| (strsim::normalized_levenshtein(&needle, title), id.as_str()))
            .filter(|(similarity, _)| *similarity >= FUZZY_CUTOFF)
            .collect();
        // Stable: equal similarity keeps id order
        fuzzy.sort_by(|a, b| b.0.total_cmp(&a.0));
        fuzzy.truncate(limit * 3);
        hits.extend(fuzzy.into_iter().map(|(_, id)| id));
    }

    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|id| seen.insert(*id))
        .take(limit)
        .filter_map(|id| {
            let meta = store.all_metadata().get(id)?;
            Some(SearchHit {
                id: id.to_string(),
                title: meta.title.clone(),
                artists: meta.artist_names.clone(),
                year: meta.year,
                pop_bucket: meta.pop_bucket,
            })
        })
        .collect()
}
