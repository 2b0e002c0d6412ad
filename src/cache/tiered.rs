//! Resolution orchestrator: exact → fuzzy → semantic, then write-back.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use super::error::{ResolveError, ResolveResult};
use super::exact::ExactMatchStore;
use super::fuzzy::FuzzyIndex;
use super::types::{MatchOrigin, ResolutionStage};
use super::writer::CacheWriter;
use crate::constants::{DEFAULT_FUZZY_THRESHOLD, is_valid_threshold};
use crate::keys::normalize_key;
use crate::semantic::{SemanticBackend, SemanticError};
use crate::storage::{EntryStore, FoodRecord, StorageResult};

#[cfg(any(test, feature = "mock"))]
use crate::semantic::MockSemanticBackend;
#[cfg(any(test, feature = "mock"))]
use crate::storage::MockEntryStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverConfig {
    /// Minimum fuzzy ratio (0–100) when a request carries no override.
    pub fuzzy_threshold: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

impl ResolverConfig {
    pub fn with_threshold(fuzzy_threshold: f64) -> Self {
        Self { fuzzy_threshold }
    }

    pub fn validate(&self) -> ResolveResult<()> {
        if is_valid_threshold(self.fuzzy_threshold) {
            Ok(())
        } else {
            Err(ResolveError::InvalidThreshold(self.fuzzy_threshold))
        }
    }
}

/// Successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Normalized query key.
    pub key: String,
    pub record: FoodRecord,
    pub origin: MatchOrigin,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
    /// `true` if this resolution was written back to the cache.
    pub stored: bool,
}

impl Resolution {
    /// Confidence as a percentage in `[0, 100]`.
    pub fn confidence_pct(&self) -> f64 {
        f64::from(self.confidence) * 100.0
    }
}

/// Outcome of [`FoodResolver::warm_up`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarmUpReport {
    /// Names resolved and written.
    pub stored: usize,
    /// Blank names or names already cached.
    pub skipped: usize,
    /// Names that could not be resolved or written.
    pub failed: usize,
}

/// Snapshot of cache sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverStats {
    pub entries: usize,
    pub fuzzy_keys: usize,
    pub corpus_rows: usize,
}

/// Food resolver over an exact store `S` and a semantic backend `M`.
pub struct FoodResolver<S: EntryStore, M: SemanticBackend> {
    store: Arc<ExactMatchStore<S>>,
    fuzzy: Arc<FuzzyIndex>,
    writer: CacheWriter<S>,
    semantic: M,
    config: ResolverConfig,
}

impl<S: EntryStore, M: SemanticBackend> std::fmt::Debug for FoodResolver<S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoodResolver")
            .field("store", &self.store)
            .field("fuzzy", &self.fuzzy)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: EntryStore, M: SemanticBackend> FoodResolver<S, M> {
    /// Opens the store and rebuilds the fuzzy index from its keys.
    pub fn open(backend: S, semantic: M, config: ResolverConfig) -> ResolveResult<Self> {
        config.validate()?;

        let store = ExactMatchStore::open(backend).map_err(|e| ResolveError::Unavailable {
            stage: ResolutionStage::NotStarted,
            reason: e.to_string(),
        })?;

        Ok(Self::from_store(store, semantic, config))
    }

    /// Wraps an already opened store.
    pub fn from_store(store: ExactMatchStore<S>, semantic: M, config: ResolverConfig) -> Self {
        let store = Arc::new(store);
        let fuzzy = Arc::new(FuzzyIndex::from_keys(store.keys()));
        let writer = CacheWriter::new(Arc::clone(&store), Arc::clone(&fuzzy));

        info!(
            entries = store.size(),
            fuzzy_keys = fuzzy.len(),
            threshold = config.fuzzy_threshold,
            "Food resolver ready"
        );

        Self {
            store,
            fuzzy,
            writer,
            semantic,
            config,
        }
    }

    /// Resolves free text to a food record.
    ///
    /// `threshold` overrides the configured fuzzy threshold for this call.
    #[instrument(skip(self), fields(query_len = query.len()))]
    pub fn resolve(&self, query: &str, threshold: Option<f64>) -> ResolveResult<Resolution> {
        let threshold = threshold.unwrap_or(self.config.fuzzy_threshold);
        if !is_valid_threshold(threshold) {
            return Err(ResolveError::InvalidThreshold(threshold));
        }

        let key = normalize_key(query);
        if key.is_empty() {
            return Err(ResolveError::EmptyQuery);
        }

        let mut stage = ResolutionStage::NotStarted;

        match self.store.get_entry(&key) {
            Ok(Some(entry)) => {
                info!(key = %key, "Exact hit");
                return Ok(Resolution {
                    key,
                    record: entry.record,
                    origin: MatchOrigin::Exact,
                    confidence: entry.confidence,
                    stored: false,
                });
            }
            Ok(None) => debug!(key = %key, "Exact miss"),
            Err(e) => warn!(key = %key, error = %e, "Exact lookup failed; treating as miss"),
        }
        stage = advance(stage, ResolutionStage::ExactTried);

        if let Some(found) = self.fuzzy.best_match(&key, threshold) {
            match self.store.get(&found.key) {
                Ok(Some(record)) => {
                    info!(key = %key, matched = %found.key, score = found.score, "Fuzzy hit");
                    return Ok(Resolution {
                        key,
                        record,
                        origin: MatchOrigin::Fuzzy,
                        confidence: (found.score / 100.0) as f32,
                        stored: false,
                    });
                }
                Ok(None) => error!(
                    key = %key,
                    matched = %found.key,
                    "Fuzzy key has no stored row; falling through"
                ),
                Err(e) => warn!(
                    matched = %found.key,
                    error = %e,
                    "Fuzzy row read failed; falling through"
                ),
            }
        } else {
            debug!(key = %key, threshold, "Fuzzy miss");
        }
        stage = advance(stage, ResolutionStage::FuzzyTried);

        let found = match self.semantic.resolve(&key) {
            Ok(found) => found,
            Err(e) => {
                let failed = advance(stage, ResolutionStage::Failed);
                return Err(semantic_failure(key, failed, e));
            }
        };
        stage = advance(stage, ResolutionStage::SemanticTried);

        let confidence = found.confidence();
        let stored = self
            .writer
            .commit(&key, found.record.clone(), confidence)
            .is_ok();

        info!(
            key = %key,
            product = %found.record.canonical_name(),
            score = found.score,
            stored,
            stage = %advance(stage, ResolutionStage::Resolved),
            "Resolved semantically"
        );

        Ok(Resolution {
            key,
            record: found.record,
            origin: MatchOrigin::Semantic,
            confidence,
            stored,
        })
    }

    /// Writes `record` under the normalized `key` without resolving.
    pub fn seed(&self, key: &str, record: FoodRecord, confidence: f32) -> ResolveResult<()> {
        let key = normalize_key(key);
        if key.is_empty() {
            return Err(ResolveError::EmptyQuery);
        }

        self.writer
            .commit(&key, record, confidence)
            .map_err(|e| ResolveError::Unavailable {
                stage: ResolutionStage::SemanticTried,
                reason: e.to_string(),
            })
    }

    /// Resolves each name semantically and caches it under its own key.
    #[instrument(skip(self, names))]
    pub fn warm_up<I, N>(&self, names: I) -> WarmUpReport
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let mut report = WarmUpReport::default();

        for name in names {
            let key = normalize_key(name.as_ref());
            if key.is_empty() || self.store.contains(&key) {
                report.skipped += 1;
                continue;
            }

            let committed = self
                .semantic
                .resolve(&key)
                .map_err(|e| e.to_string())
                .and_then(|found| {
                    let confidence = found.confidence();
                    self.writer
                        .commit(&key, found.record, confidence)
                        .map_err(|e| e.to_string())
                });

            match committed {
                Ok(()) => report.stored += 1,
                Err(reason) => {
                    warn!(key = %key, reason = %reason, "Warm-up entry failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            stored = report.stored,
            skipped = report.skipped,
            failed = report.failed,
            "Cache warm-up finished"
        );
        report
    }

    /// Empties the store and the fuzzy index.
    pub fn clear(&self) -> StorageResult<()> {
        let result = self.store.clear();
        // Resync either way; a failed purge may have removed some rows.
        self.fuzzy.replace_all(self.store.keys());
        result
    }

    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            entries: self.store.size(),
            fuzzy_keys: self.fuzzy.len(),
            corpus_rows: self.semantic.corpus_rows(),
        }
    }

    /// Number of cached entries.
    pub fn size(&self) -> usize {
        self.store.size()
    }

    pub fn store(&self) -> &ExactMatchStore<S> {
        &self.store
    }

    pub fn fuzzy(&self) -> &FuzzyIndex {
        &self.fuzzy
    }

    pub fn semantic(&self) -> &M {
        &self.semantic
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

fn advance(from: ResolutionStage, to: ResolutionStage) -> ResolutionStage {
    debug!(from = %from, to = %to, "Resolution stage");
    to
}

fn semantic_failure(key: String, stage: ResolutionStage, err: SemanticError) -> ResolveError {
    if err.is_not_found() {
        warn!(key = %key, error = %err, "Semantic tier found nothing");
        ResolveError::NotFound { query: key }
    } else {
        error!(key = %key, error = %err, "Semantic tier unavailable");
        ResolveError::Unavailable {
            stage,
            reason: err.to_string(),
        }
    }
}

#[cfg(any(test, feature = "mock"))]
pub type MockFoodResolver = FoodResolver<MockEntryStore, MockSemanticBackend>;

#[cfg(any(test, feature = "mock"))]
impl FoodResolver<MockEntryStore, MockSemanticBackend> {
    /// In-memory resolver with default config.
    pub fn new_mock(semantic: MockSemanticBackend) -> ResolveResult<Self> {
        Self::open(MockEntryStore::new(), semantic, ResolverConfig::default())
    }
}
