//! Cross-cutting, shared constants.
//!
//! The embedding dimension is fixed by the corpus batch job and the sentence model
//! (all-MiniLM-L6-v2 produces 384-dim vectors). Both sides are checked against each
//! other at startup with [`validate_embedding_dim`]; a mismatch refuses to serve.

pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Tokens beyond this are truncated before the forward pass.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Minimum fuzzy ratio (0–100) accepted by the fuzzy tier.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 85.0;

pub const MIN_FUZZY_THRESHOLD: f64 = 0.0;
pub const MAX_FUZZY_THRESHOLD: f64 = 100.0;

/// Error returned when two components disagree on the embedding dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use forage::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// validate_embedding_dim(384, DEFAULT_EMBEDDING_DIM).unwrap();
/// assert!(validate_embedding_dim(768, DEFAULT_EMBEDDING_DIM).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if expected == 0 || actual == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Returns `true` if `threshold` is a usable fuzzy ratio cutoff.
#[inline]
pub fn is_valid_threshold(threshold: f64) -> bool {
    (MIN_FUZZY_THRESHOLD..=MAX_FUZZY_THRESHOLD).contains(&threshold)
}
