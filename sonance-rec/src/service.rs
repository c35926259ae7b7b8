//! Recommendation service
//!
//! Orchestrates the pipeline for single-seed and multi-seed requests. Both
//! entry points are pure functions of the immutable store and the request
//! parameters. Unresolvable seeds yield an empty result, never an error.

use crate::pipeline::{
    build_profile, filter_by_era, filter_by_tag, rerank, sample_by_bucket, search_excluding, Candidate,
};
use crate::store::{normalize_in_place, MetadataLookup, VectorStore};
use serde::Serialize;
use sonance_common::{normalize_track_id, RecommendParams};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Display record returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: String,
    pub score: f32,
    /// Track title, falls back to the id
    pub title: String,
    pub artists: Vec<String>,
    pub year: Option<i32>,
    pub pop_bucket: Option<u8>,
    pub tags: Vec<String>,
}

/// Recommendation entry points over a shared store
#[derive(Debug, Clone)]
pub struct RecommendationService {
    store: Arc<VectorStore>,
    params: RecommendParams,
}

impl RecommendationService {
    pub fn new(store: Arc<VectorStore>, params: RecommendParams) -> Self {
        Self { store, params }
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    pub fn params(&self) -> &RecommendParams {
        &self.params
    }

    /// Tracks similar to one seed reference (bare id, URI or URL)
    pub fn recommend_single(
        &self,
        seed_ref: &str,
        k: usize,
        bucket_bias: f32,
        required_tag: Option<&str>,
    ) -> Vec<Recommendation> {
        let seed = normalize_track_id(seed_ref);
        let Some(query) = self.store.vector(&seed) else {
            debug!("Unresolvable seed '{}'", seed_ref);
            return Vec::new();
        };

        self.run_pipeline(query, &[seed.as_str()], k, bucket_bias, required_tag)
    }

    /// Tracks similar to the centroid of several seeds
    ///
    /// Unresolvable and duplicate references are skipped; no resolvable seed
    /// gives an empty result.
    pub fn recommend_multi<S: AsRef<str>>(
        &self,
        seed_refs: &[S],
        k: usize,
        bucket_bias: f32,
        required_tag: Option<&str>,
    ) -> Vec<Recommendation> {
        let mut seen = HashSet::new();
        let seeds: Vec<String> = seed_refs
            .iter()
            .map(|r| normalize_track_id(r.as_ref()))
            .filter(|id| self.store.contains(id))
            .filter(|id| seen.insert(id.clone()))
            .collect();

        let vectors: Vec<&[f32]> = seeds.iter().filter_map(|id| self.store.vector(id)).collect();
        let Some(query) = centroid(&vectors) else {
            debug!("No resolvable seeds among {} references", seed_refs.len());
            return Vec::new();
        };

        let seed_ids: Vec<&str> = seeds.iter().map(String::as_str).collect();
        self.run_pipeline(&query, &seed_ids, k, bucket_bias, required_tag)
    }

    fn run_pipeline(
        &self,
        query: &[f32],
        seeds: &[&str],
        k: usize,
        bucket_bias: f32,
        required_tag: Option<&str>,
    ) -> Vec<Recommendation> {
        if k == 0 {
            return Vec::new();
        }
        let store = self.store.as_ref();
        let params = &self.params;
        let shortlist_size = params.shortlist_size(k);

        let exclude: HashSet<&str> = seeds.iter().copied().collect();
        let recalled = search_excluding(store, query, params.recall_size(k), &exclude);
        let recalled_count = recalled.len();

        let profile = build_profile(seeds.iter().map(|id| store.metadata_or_empty(id)));

        let era = filter_by_era(
            recalled,
            store,
            profile.year,
            shortlist_size,
            &params.era_widths,
            params.era_min_keep,
        );
        let era_count = era.len();

        let shortlist = sample_by_bucket(era, store, shortlist_size, bucket_bias, params.sampler_seed);
        let shortlist_count = shortlist.len();

        let ranked = rerank(shortlist, store, &profile, params);
        let mut ranked = filter_by_tag(ranked, store, required_tag);
        ranked.truncate(k);

        debug!(
            "Pipeline: seeds={} recalled={} era={} shortlist={} returned={}",
            seeds.len(),
            recalled_count,
            era_count,
            shortlist_count,
            ranked.len()
        );

        ranked.into_iter().map(|c| self.display_record(c)).collect()
    }

    fn display_record(&self, candidate: Candidate) -> Recommendation {
        let meta = self.store.metadata_or_empty(&candidate.id);
        Recommendation {
            title: meta.title.clone().unwrap_or_else(|| candidate.id.clone()),
            artists: meta.artist_names.clone(),
            year: meta.year,
            pop_bucket: meta.pop_bucket,
            tags: meta.tags.clone(),
            score: candidate.score,
            id: candidate.id,
        }
    }
}

/// Unit-length mean of unit vectors; `None` for an empty set
pub fn centroid(vectors: &[&[f32]]) -> Option<Vec<f32>> {
    let first = vectors.first()?;
    let mut mean = vec![0.0f32; first.len()];
    for v in vectors {
        for (acc, x) in mean.iter_mut().zip(v.iter()) {
            *acc += x;
        }
    }
    let n = vectors.len() as f32;
    for acc in mean.iter_mut() {
        *acc /= n;
    }
    normalize_in_place(&mut mean);
    Some(mean)
}
