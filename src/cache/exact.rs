//! Exact-match store: durable entry table mirrored into an in-memory index.
//!
//! The index maps normalized keys to backend handles (mmap views for the disk
//! backend). Writers hold the index write lock across the durable write, so the
//! index never runs ahead of disk and a successful `put` is immediately visible.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{debug, info, instrument};

use crate::storage::{CacheEntry, EntryStore, FoodRecord, StorageResult};

struct Slot<H> {
    handle: H,
    /// Mirrors `CacheEntry::seq`.
    seq: u64,
}

struct IndexState<H> {
    slots: HashMap<String, Slot<H>>,
    next_seq: u64,
}

/// Durable key → [`CacheEntry`] table with O(1) in-memory lookup.
pub struct ExactMatchStore<S: EntryStore> {
    backend: S,
    index: RwLock<IndexState<S::Handle>>,
}

impl<S: EntryStore> ExactMatchStore<S> {
    /// Opens the store and loads every persisted key into the index.
    ///
    /// Keys are ordered by the sequence persisted with each entry, so insertion
    /// order survives a restart.
    #[instrument(skip(backend))]
    pub fn open(backend: S) -> StorageResult<Self> {
        let mut entries = backend.scan()?;
        entries.sort_by(|(a, _), (b, _)| {
            a.seq
                .cmp(&b.seq)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.query_key.cmp(&b.query_key))
        });

        let next_seq = entries.last().map_or(0, |(entry, _)| entry.seq + 1);

        let mut slots = HashMap::with_capacity(entries.len());
        for (entry, handle) in entries {
            slots.insert(
                entry.query_key,
                Slot {
                    handle,
                    seq: entry.seq,
                },
            );
        }

        info!(entries = slots.len(), "Exact-match store loaded");

        Ok(Self {
            backend,
            index: RwLock::new(IndexState { slots, next_seq }),
        })
    }

    /// Looks up a normalized key and returns the full entry.
    pub fn get_entry(&self, key: &str) -> StorageResult<Option<CacheEntry>> {
        let handle = match self.index.read().slots.get(key) {
            Some(slot) => slot.handle.clone(),
            None => return Ok(None),
        };

        self.backend.read(&handle).map(Some)
    }

    /// Looks up a normalized key and returns only the record.
    pub fn get(&self, key: &str) -> StorageResult<Option<FoodRecord>> {
        Ok(self.get_entry(key)?.map(|entry| entry.record))
    }

    /// Upserts `key`; the entry is durable and visible when this returns `Ok`.
    #[instrument(skip(self, record), fields(key = %key))]
    pub fn put(&self, key: &str, record: FoodRecord, confidence: f32) -> StorageResult<CacheEntry> {
        let mut entry = CacheEntry::new(key, record, confidence);

        let mut index = self.index.write();
        let existing = index.slots.get(key).map(|slot| slot.seq);
        entry.seq = existing.unwrap_or(index.next_seq);

        let handle = self.backend.persist(&entry)?;

        if existing.is_none() {
            index.next_seq += 1;
        }
        index.slots.insert(
            key.to_string(),
            Slot {
                handle,
                seq: entry.seq,
            },
        );
        drop(index);

        debug!(confidence = entry.confidence, seq = entry.seq, "Entry stored");
        Ok(entry)
    }

    /// Returns `true` if `key` is indexed.
    pub fn contains(&self, key: &str) -> bool {
        self.index.read().slots.contains_key(key)
    }

    /// Number of stored entries.
    pub fn size(&self) -> usize {
        self.index.read().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// All keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        let index = self.index.read();
        let mut keyed: Vec<(&String, u64)> =
            index.slots.iter().map(|(k, slot)| (k, slot.seq)).collect();
        keyed.sort_by_key(|(_, seq)| *seq);
        keyed.into_iter().map(|(k, _)| k.clone()).collect()
    }

    /// Removes every entry from disk and from the index.
    #[instrument(skip(self))]
    pub fn clear(&self) -> StorageResult<()> {
        let mut index = self.index.write();
        self.backend.purge()?;
        index.slots.clear();
        info!("Exact-match store cleared");
        Ok(())
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }
}

impl<S: EntryStore> std::fmt::Debug for ExactMatchStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExactMatchStore")
            .field("entries", &self.size())
            .finish_non_exhaustive()
    }
}
