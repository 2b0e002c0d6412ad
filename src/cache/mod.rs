//! Exact store, fuzzy index and the resolver that chains them with the semantic tier.

pub mod error;
pub mod exact;
pub mod fuzzy;
pub mod tiered;
pub mod types;
pub mod writer;

#[cfg(test)]
mod fuzzy_tests;

pub use error::{ResolveError, ResolveResult};
pub use exact::ExactMatchStore;
pub use fuzzy::{FuzzyIndex, FuzzyMatch, accepts, similarity_ratio};
#[cfg(any(test, feature = "mock"))]
pub use tiered::MockFoodResolver;
pub use tiered::{FoodResolver, Resolution, ResolverConfig, ResolverStats, WarmUpReport};
pub use types::{
    FORAGE_STATUS_ERROR, FORAGE_STATUS_HEADER, FORAGE_STATUS_HEALTHY, FORAGE_STATUS_NOT_READY,
    FORAGE_STATUS_READY, MatchOrigin, ResolutionStage,
};
pub use writer::CacheWriter;
