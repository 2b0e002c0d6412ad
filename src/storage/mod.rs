//! Durable storage for the exact-match table.

pub mod backend;
pub mod disk;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod mmap;
mod model;

pub use backend::EntryStore;
pub use disk::DiskEntryStore;
pub use error::{StorageError, StorageResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEntryStore;
pub use model::{ArchivedStoredEntry, CacheEntry, FoodRecord, StoredEntry};
