//! Shared fixtures for sonance-rec integration tests

#![allow(dead_code)]

use serde_json::{json, Value};
use sonance_common::config::StorePaths;
use sonance_common::RecommendParams;
use sonance_rec::store::TrackMetadata;
use sonance_rec::{RecommendationService, VectorStore};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Vector file plus metadata file in a temp folder
pub struct Fixture {
    pub dir: TempDir,
    pub paths: StorePaths,
}

/// Write `features` and `meta` JSON documents into a fresh temp folder
pub fn write_fixture(features: &Value, meta: &Value) -> Fixture {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let paths = StorePaths::in_dir(dir.path());
    write_json(&paths.features, features);
    write_json(&paths.meta, meta);
    Fixture { dir, paths }
}

pub fn write_json(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_vec_pretty(value).unwrap()).expect("Should write fixture file");
}

/// Four-track store: t1 and t2 nearly parallel, t3 orthogonal, t4 opposite
pub fn toy_features() -> Value {
    json!({
        "ids": ["t1", "t2", "t3", "t4"],
        "dim": 2,
        "vectors": [[1.0, 0.0], [0.9, 0.1], [0.0, 1.0], [-1.0, 0.0]]
    })
}

pub fn toy_meta() -> Value {
    json!({
        "t1": { "title": "First Light", "artist_names": ["Aurora Lane"], "year": 2000, "pop_bucket": 5 },
        "t2": { "title": "Second Wind", "artists": ["Brass Harbor"], "year": "2001-06-01", "pop_bucket": "5" },
        "t3": { "title": "Third Rail", "artist_names": "Cold Meadow", "year": 2020.0, "pop_bucket": 5, "genres": ["Synth Pop"] },
        "t4": { "title": "Fourth Wall", "artist_names": ["Dune Relay"], "year": 1990, "pop_bucket": 5 }
    })
}

pub fn toy_store() -> VectorStore {
    let fixture = write_fixture(&toy_features(), &toy_meta());
    VectorStore::load(&fixture.paths).expect("Toy store should load")
}

pub fn toy_service() -> RecommendationService {
    RecommendationService::new(Arc::new(toy_store()), RecommendParams::default())
}

/// Larger deterministic catalog of `n` tracks on a 3-d spiral
///
/// Artists repeat every 7 tracks, years span 1970..2019, tiers cycle 0..=10.
pub fn spiral_store(n: usize) -> VectorStore {
    let mut ids = Vec::with_capacity(n);
    let mut vectors = Vec::with_capacity(n);
    let mut metadata = HashMap::new();
    for i in 0..n {
        let id = format!("s{:04}", i);
        let angle = i as f32 * 0.37;
        vectors.push(vec![angle.cos(), angle.sin(), (i % 13) as f32 * 0.05]);
        metadata.insert(
            id.clone(),
            TrackMetadata {
                title: Some(format!("Spiral {}", i)),
                artist_names: vec![format!("Artist {}", i % 7)],
                year: Some(1970 + (i % 50) as i32),
                pop_bucket: Some((i % 11) as u8),
                tags: if i % 4 == 0 { vec!["ambient".to_string()] } else { Vec::new() },
            },
        );
        ids.push(id);
    }
    VectorStore::from_parts(ids, vectors, metadata).expect("Spiral store should build")
}

pub fn spiral_service(n: usize) -> RecommendationService {
    RecommendationService::new(Arc::new(spiral_store(n)), RecommendParams::default())
}
