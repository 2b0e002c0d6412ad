//! In-memory [`EntryStore`] with switchable failures.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::storage::CacheEntry;
use crate::storage::backend::EntryStore;
use crate::storage::error::{StorageError, StorageResult};

#[derive(Default)]
struct MockState {
    entries: RwLock<HashMap<String, Arc<CacheEntry>>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    persist_calls: AtomicUsize,
}

/// Clones share state, so a clone handed to a second store simulates a restart.
#[derive(Default, Clone)]
pub struct MockEntryStore {
    state: Arc<MockState>,
}

impl MockEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.state.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.state.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn persist_calls(&self) -> usize {
        self.state.persist_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.state.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.entries.read().is_empty()
    }

    /// Drops a row behind the index's back (for consistency-failure tests).
    pub fn remove_raw(&self, key: &str) -> Option<CacheEntry> {
        self.state
            .entries
            .write()
            .remove(key)
            .map(|e| (*e).clone())
    }
}

impl EntryStore for MockEntryStore {
    type Handle = Arc<CacheEntry>;

    fn persist(&self, entry: &CacheEntry) -> StorageResult<Arc<CacheEntry>> {
        self.state.persist_calls.fetch_add(1, Ordering::SeqCst);

        if entry.query_key.is_empty() {
            return Err(StorageError::EmptyKey);
        }
        if self.state.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed("mock write failure".to_string()));
        }

        let stored = Arc::new(entry.clone());
        self.state
            .entries
            .write()
            .insert(entry.query_key.clone(), Arc::clone(&stored));
        Ok(stored)
    }

    fn read(&self, handle: &Arc<CacheEntry>) -> StorageResult<CacheEntry> {
        if self.state.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::ReadFailed("mock read failure".to_string()));
        }
        Ok((**handle).clone())
    }

    fn scan(&self) -> StorageResult<Vec<(CacheEntry, Arc<CacheEntry>)>> {
        if self.state.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::ReadFailed("mock read failure".to_string()));
        }
        Ok(self
            .state
            .entries
            .read()
            .values()
            .map(|e| ((**e).clone(), Arc::clone(e)))
            .collect())
    }

    fn purge(&self) -> StorageResult<()> {
        if self.state.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed("mock purge failure".to_string()));
        }
        self.state.entries.write().clear();
        Ok(())
    }
}
