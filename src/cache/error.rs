use thiserror::Error;

use super::types::ResolutionStage;

#[derive(Debug, Error)]
/// Errors returned by [`FoodResolver`](super::FoodResolver).
pub enum ResolveError {
    /// The query normalized to the empty string.
    #[error("query is empty")]
    EmptyQuery,

    /// Threshold override outside `[0, 100]`.
    #[error("fuzzy threshold {0} is outside [0, 100]")]
    InvalidThreshold(f64),

    /// Every tier ran and none produced a record.
    #[error("no food matched '{query}'")]
    NotFound {
        /// Normalized query.
        query: String,
    },

    /// The semantic tier could not run.
    #[error("resolution unavailable at stage {stage}: {reason}")]
    Unavailable {
        /// Stage the resolution had reached.
        stage: ResolutionStage,
        /// Error message.
        reason: String,
    },
}

pub type ResolveResult<T> = Result<T, ResolveError>;
