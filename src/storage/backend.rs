use crate::storage::CacheEntry;
use crate::storage::error::StorageResult;

/// Durable key → entry table behind the exact-match index.
///
/// `persist` must be durable when it returns `Ok`. The returned handle is what the
/// in-memory index keeps; `read` turns it back into an entry.
pub trait EntryStore: Send + Sync {
    type Handle: Clone + Send + Sync;

    /// Upserts `entry` under `entry.query_key`.
    fn persist(&self, entry: &CacheEntry) -> StorageResult<Self::Handle>;

    /// Decodes the entry behind a handle returned by `persist` or `scan`.
    fn read(&self, handle: &Self::Handle) -> StorageResult<CacheEntry>;

    /// Enumerates every readable entry (used to rebuild indexes at startup).
    fn scan(&self) -> StorageResult<Vec<(CacheEntry, Self::Handle)>>;

    /// Removes every entry.
    fn purge(&self) -> StorageResult<()>;
}
