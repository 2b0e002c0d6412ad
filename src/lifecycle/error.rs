use thiserror::Error;

use crate::cache::ResolveError;
use crate::config::ConfigError;
use crate::constants::DimValidationError;
use crate::corpus::CorpusError;
use crate::embedding::EmbeddingError;
use crate::nutrition::NutritionError;
use crate::storage::StorageError;

/// Failure to bring the resolver up; the process should exit.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("corpus unavailable: {0}")]
    Corpus(#[from] CorpusError),

    #[error("embedder unavailable: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("embedder and corpus disagree: {0}")]
    Dimension(#[from] DimValidationError),

    #[error("cache store unavailable: {0}")]
    Storage(#[from] StorageError),

    #[error("resolver setup failed: {0}")]
    Resolver(#[from] ResolveError),

    #[error("nutrition client setup failed: {0}")]
    Nutrition(#[from] NutritionError),
}

pub type StartupResult<T> = Result<T, StartupError>;
