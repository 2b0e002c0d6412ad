use std::path::PathBuf;
use thiserror::Error;

use crate::storage::mmap::MmapError;

#[derive(Error, Debug)]
/// Failures of the durable exact-match store.
pub enum StorageError {
    /// IO error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Mmap error.
    #[error("mmap error: {0}")]
    Mmap(#[from] MmapError),

    /// Entry could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Persisted bytes did not decode into an entry.
    #[error("corrupt entry at {path}: {reason}")]
    Corrupt {
        /// File holding the bad bytes.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// Storage root path is missing/unavailable.
    #[error("storage path unavailable: {path}")]
    Unavailable {
        /// Path that was unavailable.
        path: PathBuf,
    },

    /// Empty keys never map to a record.
    #[error("refusing to store an empty key")]
    EmptyKey,

    /// Backend refused the write (used by test doubles and read-only roots).
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// Backend refused the read.
    #[error("read failed: {0}")]
    ReadFailed(String),
}

/// Convenience result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
