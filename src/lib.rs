//! Forage library crate (used by the server and integration tests).
//!
//! Resolves free-text food descriptions to canonical product records through
//! three tiers:
//!
//! 1. **Exact**: a persistent store keyed by the normalized description.
//! 2. **Fuzzy**: an Indel similarity ratio over every cached key.
//! 3. **Semantic**: a sentence embedding compared against a fixed product
//!    corpus. Results from this tier are written back to the exact store.
//!
//! ## Core Types
//! - [`FoodResolver`], [`Resolution`], [`ResolveError`] - The resolution chain
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`FoodRecord`], [`CacheEntry`] - Stored product rows
//!
//! ## Semantic Tier
//! - [`SentenceEmbedder`], [`EmbedderConfig`] - Embedding generation
//! - [`EmbeddingCorpus`] - Precomputed product vectors and metadata
//! - [`SemanticResolver`] - Cosine nearest-row lookup
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod corpus;
pub mod embedding;
pub mod gateway;
pub mod keys;
pub mod lifecycle;
pub mod nutrition;
pub mod semantic;
pub mod storage;

#[cfg(any(test, feature = "mock"))]
pub use cache::MockFoodResolver;
pub use cache::{
    ExactMatchStore, FORAGE_STATUS_HEADER, FoodResolver, FuzzyIndex, MatchOrigin, Resolution,
    ResolveError, ResolveResult, ResolverConfig, ResolverStats, WarmUpReport, similarity_ratio,
};

pub use config::{Config, ConfigError};
pub use constants::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_FUZZY_THRESHOLD, DimValidationError, validate_embedding_dim,
};
pub use corpus::{CorpusError, CorpusRow, EmbeddingCorpus};
pub use embedding::{EmbedderConfig, EmbeddingError, SentenceEmbedder};
pub use keys::{hash_key_hex, normalize_key};
pub use lifecycle::{ServiceResolver, StartupError, bootstrap};
#[cfg(any(test, feature = "mock"))]
pub use nutrition::MockNutritionLookup;
pub use nutrition::{NutritionError, NutritionLookup, OpenFoodFactsClient};
#[cfg(any(test, feature = "mock"))]
pub use semantic::MockSemanticBackend;
pub use semantic::{SemanticBackend, SemanticError, SemanticResolver};
#[cfg(any(test, feature = "mock"))]
pub use storage::MockEntryStore;
pub use storage::{CacheEntry, DiskEntryStore, EntryStore, FoodRecord};
