use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or build the embedding corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus file not found: {path}")]
    MissingFile { path: PathBuf },

    #[error("failed to read corpus vectors from {path}: {reason}")]
    Vectors { path: PathBuf, reason: String },

    #[error("failed to read corpus metadata: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid metadata at line {line}: {reason}")]
    Metadata { line: usize, reason: String },

    #[error("corpus misaligned: {vectors} vector rows vs {metadata} metadata rows")]
    RowCountMismatch { vectors: usize, metadata: usize },

    #[error("vector row {row} has {actual} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("corpus vectors have zero dimension")]
    ZeroDimension,
}

pub type CorpusResult<T> = Result<T, CorpusError>;
