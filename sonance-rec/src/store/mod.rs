//! Immutable in-memory vector index
//!
//! Owns the track id sequence, the row-aligned vector matrix (row-major,
//! L2-normalized at load), the metadata map and the id → row map. Nothing is
//! mutated after construction; a catalog refresh means loading a new store.

mod metadata;
mod shared;

pub use metadata::{
    pop_bucket_from_value, string_list_from_value, year_from_value, MetadataLookup, TrackMetadata,
    EMPTY_METADATA, MAX_POP_BUCKET,
};
pub use shared::{init_shared_store, shared_store};

use serde::Deserialize;
use sonance_common::config::StorePaths;
use sonance_common::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

/// Guard added to the norm so zero vectors stay finite
pub const NORM_EPSILON: f32 = 1e-8;

/// On-disk layout of the vector file
#[derive(Debug, Deserialize)]
struct VectorFile {
    ids: Vec<String>,
    #[serde(default)]
    dim: Option<usize>,
    vectors: Vec<Vec<f32>>,
}

/// Process-wide, read-only track index
#[derive(Debug)]
pub struct VectorStore {
    ids: Vec<String>,
    dim: usize,
    matrix: Vec<f32>,
    id_to_row: HashMap<String, usize>,
    metadata: HashMap<String, TrackMetadata>,
    /// (lower-cased title, id), ordered by id
    title_index: Vec<(String, String)>,
}

impl VectorStore {
    /// Load the vector and metadata files
    ///
    /// # Errors
    /// Returns `Error::Load` if either file is missing, is not valid JSON of
    /// the expected shape, or the vector file is structurally inconsistent.
    pub fn load(paths: &StorePaths) -> Result<Self> {
        let vector_file: VectorFile = read_json(&paths.features)?;
        let metadata: HashMap<String, TrackMetadata> = read_json(&paths.meta)?;

        if let Some(dim) = vector_file.dim {
            if let Some(row) = vector_file.vectors.iter().position(|v| v.len() != dim) {
                return Err(Error::load(
                    &paths.features,
                    format!("row {} has {} columns, header says {}", row, vector_file.vectors[row].len(), dim),
                ));
            }
        }

        let store = Self::from_parts(vector_file.ids, vector_file.vectors, metadata)
            .map_err(|e| Error::load(&paths.features, e.to_string()))?;

        info!(
            "Loaded vector store: {} tracks, dim {}, {} metadata records",
            store.len(),
            store.dim,
            store.metadata.len()
        );
        Ok(store)
    }

    /// Build a store from in-memory parts
    ///
    /// Rows are renormalized to unit length. Duplicate ids keep the row of
    /// their last occurrence.
    ///
    /// # Errors
    /// Returns `Error::InvalidInput` on row count mismatch, ragged rows,
    /// zero dimension, or an empty catalog.
    pub fn from_parts(
        ids: Vec<String>,
        vectors: Vec<Vec<f32>>,
        metadata: HashMap<String, TrackMetadata>,
    ) -> Result<Self> {
        if ids.len() != vectors.len() {
            return Err(Error::InvalidInput(format!(
                "row count mismatch: {} ids, {} vectors",
                ids.len(),
                vectors.len()
            )));
        }
        let dim = match vectors.first() {
            Some(first) if !first.is_empty() => first.len(),
            Some(_) => return Err(Error::InvalidInput("vectors have zero dimension".to_string())),
            None => return Err(Error::InvalidInput("catalog is empty".to_string())),
        };
        if let Some(row) = vectors.iter().position(|v| v.len() != dim) {
            return Err(Error::InvalidInput(format!(
                "row {} has {} columns, expected {}",
                row,
                vectors[row].len(),
                dim
            )));
        }

        let mut last_row: HashMap<&str, usize> = HashMap::with_capacity(ids.len());
        for (row, id) in ids.iter().enumerate() {
            last_row.insert(id.as_str(), row);
        }
        let duplicates = ids.len() - last_row.len();
        if duplicates > 0 {
            warn!("{} duplicate track ids in vector file, keeping last occurrence", duplicates);
        }

        let keep: Vec<bool> = ids
            .iter()
            .enumerate()
            .map(|(row, id)| last_row.get(id.as_str()) == Some(&row))
            .collect();

        let mut kept_ids = Vec::with_capacity(last_row.len());
        let mut matrix = Vec::with_capacity(last_row.len() * dim);
        for ((id, mut vector), keep) in ids.into_iter().zip(vectors).zip(keep) {
            if !keep {
                continue;
            }
            normalize_in_place(&mut vector);
            matrix.extend_from_slice(&vector);
            kept_ids.push(id);
        }

        let id_to_row = kept_ids
            .iter()
            .enumerate()
            .map(|(row, id)| (id.clone(), row))
            .collect();

        let mut title_index: Vec<(String, String)> = metadata
            .iter()
            .filter_map(|(id, m)| {
                let title = m.title.as_deref()?.trim();
                (!title.is_empty()).then(|| (title.to_lowercase(), id.clone()))
            })
            .collect();
        title_index.sort_by(|a, b| a.1.cmp(&b.1));

        Ok(Self {
            ids: kept_ids,
            dim,
            matrix,
            id_to_row,
            metadata,
            title_index,
        })
    }

    /// Number of indexed tracks
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Vector dimension
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Row-major matrix, `len() * dim()` values
    pub fn matrix(&self) -> &[f32] {
        &self.matrix
    }

    /// Id of the track stored at `row`
    pub fn id_at(&self, row: usize) -> &str {
        &self.ids[row]
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_to_row.contains_key(id)
    }

    /// Unit vector for `id`
    pub fn vector(&self, id: &str) -> Option<&[f32]> {
        let row = *self.id_to_row.get(id)?;
        Some(&self.matrix[row * self.dim..(row + 1) * self.dim])
    }

    /// Every metadata record, including tracks without a vector
    pub fn all_metadata(&self) -> &HashMap<String, TrackMetadata> {
        &self.metadata
    }

    /// Lower-cased titles paired with ids, ordered by id
    pub fn title_index(&self) -> &[(String, String)] {
        &self.title_index
    }
}

impl MetadataLookup for VectorStore {
    fn metadata(&self, id: &str) -> Option<&TrackMetadata> {
        self.metadata.get(id)
    }
}

/// Scale `v` to unit length: `v / (‖v‖₂ + ε)`
pub fn normalize_in_place(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    let scale = 1.0 / (norm + NORM_EPSILON);
    for x in v.iter_mut() {
        *x *= scale;
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| Error::load(path, e.to_string()))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::load(path, e.to_string()))
}
