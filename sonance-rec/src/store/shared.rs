//! Process-wide store instance
//!
//! Exactly one load per process. Concurrent first callers block until the
//! winning load finishes; nobody observes a partially built store.

use super::VectorStore;
use once_cell::sync::OnceCell;
use sonance_common::config::StorePaths;
use sonance_common::Result;
use std::sync::Arc;
use tracing::info;

static STORE: OnceCell<Arc<VectorStore>> = OnceCell::new();

/// Load the shared store if it is not loaded yet, and return it
///
/// A failed load leaves the cell empty, so a later call retries.
pub fn init_shared_store(paths: &StorePaths) -> Result<Arc<VectorStore>> {
    STORE
        .get_or_try_init(|| {
            info!(
                "Loading vector store (features: {}, meta: {})",
                paths.features.display(),
                paths.meta.display()
            );
            VectorStore::load(paths).map(Arc::new)
        })
        .cloned()
}

/// The shared store, if it has been loaded
pub fn shared_store() -> Option<Arc<VectorStore>> {
    STORE.get().cloned()
}
