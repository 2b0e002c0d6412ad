use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading the sentence model or encoding a description.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// A required model file is missing from the model directory.
    #[error("sentence model file missing: {path}")]
    ModelNotFound { path: PathBuf },

    /// Weights or `config.json` could not be turned into a BERT model.
    #[error("failed to load sentence model: {0}")]
    ModelLoadFailed(#[source] candle_core::Error),

    /// The forward pass or pooling failed for a single input.
    #[error("sentence encoding failed: {0}")]
    InferenceFailed(#[from] candle_core::Error),

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },
}

pub type EmbeddingResult<T> = Result<T, EmbeddingError>;
