//! Disk-backed entry table (one rkyv file per normalized key).
//!
//! Files are named by the BLAKE3 hex digest of the key, so arbitrary user text never
//! reaches the filesystem as a path. Writes go to a temp file, are fsynced, then
//! renamed over the final name.

#[cfg(test)]
mod tests;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use rkyv::rancor::Error as RkyvError;
use rkyv::{from_bytes, to_bytes};
use tracing::{debug, warn};

use crate::keys::hash_key_hex;
use crate::storage::backend::EntryStore;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::mmap::MmapFileHandle;
use crate::storage::model::StoredEntry;
use crate::storage::CacheEntry;

const RKYV_EXTENSION: &str = "rkyv";

const TEMP_EXTENSION: &str = "rkyv.tmp";

#[derive(Debug, Clone)]
/// Stores and retrieves [`CacheEntry`] records on disk.
pub struct DiskEntryStore {
    storage_path: PathBuf,
}

impl DiskEntryStore {
    /// Creates a store rooted at `storage_path`, creating the directory if needed.
    pub fn open(storage_path: PathBuf) -> StorageResult<Self> {
        let store = Self { storage_path };
        store.ensure_storage_path()?;
        Ok(store)
    }

    /// Returns the root storage directory.
    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    fn ensure_storage_path(&self) -> StorageResult<()> {
        if !self.storage_path.exists() {
            fs::create_dir_all(&self.storage_path).map_err(|_| StorageError::Unavailable {
                path: self.storage_path.clone(),
            })?;
        }
        if !self.storage_path.is_dir() {
            return Err(StorageError::Unavailable {
                path: self.storage_path.clone(),
            });
        }
        Ok(())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.storage_path
            .join(format!("{}.{}", hash_key_hex(key), RKYV_EXTENSION))
    }

    fn temp_entry_path(&self, key: &str) -> PathBuf {
        self.storage_path
            .join(format!("{}.{}", hash_key_hex(key), TEMP_EXTENSION))
    }

    fn decode(handle: &MmapFileHandle) -> StorageResult<CacheEntry> {
        let corrupt = |reason: String| StorageError::Corrupt {
            path: handle.path().to_path_buf(),
            reason,
        };

        let stored = from_bytes::<StoredEntry, RkyvError>(handle.as_slice())
            .map_err(|e| corrupt(e.to_string()))?;

        stored.into_entry().map_err(|e| corrupt(e.to_string()))
    }
}

impl EntryStore for DiskEntryStore {
    type Handle = MmapFileHandle;

    fn persist(&self, entry: &CacheEntry) -> StorageResult<MmapFileHandle> {
        if entry.query_key.is_empty() {
            return Err(StorageError::EmptyKey);
        }

        self.ensure_storage_path()?;

        let stored = StoredEntry::from_entry(entry)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let bytes = to_bytes::<RkyvError>(&stored)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let temp_path = self.temp_entry_path(&entry.query_key);
        let final_path = self.entry_path(&entry.query_key);

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }

        fs::rename(&temp_path, &final_path)?;

        debug!(key = %entry.query_key, path = %final_path.display(), "Entry persisted");

        Ok(MmapFileHandle::open(&final_path)?)
    }

    fn read(&self, handle: &MmapFileHandle) -> StorageResult<CacheEntry> {
        Self::decode(handle)
    }

    fn scan(&self) -> StorageResult<Vec<(CacheEntry, MmapFileHandle)>> {
        self.ensure_storage_path()?;

        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(&self.storage_path)? {
            let path = dir_entry?.path();

            if path.extension().and_then(|e| e.to_str()) != Some(RKYV_EXTENSION) {
                continue;
            }

            let handle = match MmapFileHandle::open(&path) {
                Ok(h) => h,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable entry file");
                    continue;
                }
            };

            match Self::decode(&handle) {
                Ok(entry) => entries.push((entry, handle)),
                Err(e) => {
                    warn!(error = %e, "Skipping corrupt entry file");
                }
            }
        }

        Ok(entries)
    }

    fn purge(&self) -> StorageResult<()> {
        self.ensure_storage_path()?;

        for dir_entry in fs::read_dir(&self.storage_path)? {
            let path = dir_entry?.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();

            if name.ends_with(RKYV_EXTENSION) || name.ends_with(TEMP_EXTENSION) {
                fs::remove_file(&path)?;
            }
        }

        Ok(())
    }
}
