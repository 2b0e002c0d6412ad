use std::sync::Arc;

use tracing::{debug, warn};

use super::exact::ExactMatchStore;
use super::fuzzy::FuzzyIndex;
use crate::storage::{EntryStore, FoodRecord, StorageResult};

/// Writes resolved foods back into the exact store and the fuzzy index.
///
/// The store write happens first, so every key the fuzzy index can return has a
/// row behind it.
pub struct CacheWriter<S: EntryStore> {
    store: Arc<ExactMatchStore<S>>,
    fuzzy: Arc<FuzzyIndex>,
}

impl<S: EntryStore> Clone for CacheWriter<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            fuzzy: Arc::clone(&self.fuzzy),
        }
    }
}

impl<S: EntryStore> CacheWriter<S> {
    pub fn new(store: Arc<ExactMatchStore<S>>, fuzzy: Arc<FuzzyIndex>) -> Self {
        Self { store, fuzzy }
    }

    /// Stores `(key, record, confidence)`; failures are logged and returned.
    pub fn commit(&self, key: &str, record: FoodRecord, confidence: f32) -> StorageResult<()> {
        if let Err(e) = self.store.put(key, record, confidence) {
            warn!(key = %key, error = %e, "Cache write-back failed");
            return Err(e);
        }

        let added = self.fuzzy.insert(key);
        debug!(key = %key, new_key = added, "Cache write-back committed");
        Ok(())
    }
}

impl<S: EntryStore> std::fmt::Debug for CacheWriter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheWriter")
            .field("store", &self.store)
            .field("fuzzy", &self.fuzzy)
            .finish()
    }
}
