use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum SemanticError {
    #[error("failed to encode query: {0}")]
    Encoding(#[from] EmbeddingError),

    #[error("embedding corpus is empty")]
    EmptyCorpus,

    #[error("query dimension {query} does not match corpus dimension {corpus}")]
    DimensionMismatch { query: usize, corpus: usize },

    #[error("semantic backend unavailable: {0}")]
    Unavailable(String),
}

impl SemanticError {
    /// `true` when the failure means "no answer" rather than "try again later".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EmptyCorpus | Self::Encoding(_))
    }
}

pub type SemanticResult<T> = Result<T, SemanticError>;
