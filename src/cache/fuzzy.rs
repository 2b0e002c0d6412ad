//! In-memory fuzzy index over normalized cache keys.
//!
//! Scores are the Indel-normalized ratio in `[0, 100]`, the same measure as
//! rapidfuzz's `fuzz.ratio`. Lookups scan every key; the key set is bounded by the
//! curated foods plus whatever semantic lookups have written back.

use std::collections::HashSet;

use parking_lot::RwLock;
use rapidfuzz::distance::indel;


/// Best key found by [`FuzzyIndex::best_match`].
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    pub key: String,
    /// Similarity ratio in `[0, 100]`.
    pub score: f64,
}

/// Symmetric similarity ratio of two strings in `[0, 100]`.
///
/// `100 * (len(a) + len(b) - indel(a, b)) / (len(a) + len(b))`, counted in chars.
/// Two empty strings are identical (100).
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 100.0;
    }

    let distance = indel::distance(a.chars(), b.chars());
    let matched = total.saturating_sub(distance);

    (matched as f64 * 100.0) / total as f64
}

/// Returns `true` if `score` clears `threshold` (inclusive).
#[inline]
pub fn accepts(score: f64, threshold: f64) -> bool {
    score >= threshold
}

#[derive(Default)]
struct FuzzyState {
    keys: Vec<String>,
    members: HashSet<String>,
}

/// Ordered set of known keys.
#[derive(Default)]
pub struct FuzzyIndex {
    state: RwLock<FuzzyState>,
}

impl FuzzyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from keys in insertion order (duplicates ignored).
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let index = Self::new();
        index.replace_all(keys);
        index
    }

    /// Adds `key`; returns `false` if it was already present (position kept).
    pub fn insert(&self, key: &str) -> bool {
        let mut state = self.state.write();
        if state.members.contains(key) {
            return false;
        }
        state.members.insert(key.to_string());
        state.keys.push(key.to_string());
        true
    }

    /// Replaces the whole key set in one step.
    pub fn replace_all<I, K>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut fresh = FuzzyState::default();
        for key in keys {
            let key = key.into();
            if fresh.members.insert(key.clone()) {
                fresh.keys.push(key);
            }
        }
        *self.state.write() = fresh;
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.read().members.contains(key)
    }

    pub fn len(&self) -> usize {
        self.state.read().keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        *self.state.write() = FuzzyState::default();
    }

    /// Highest-scoring key with `score >= threshold`; ties keep the earliest key.
    pub fn best_match(&self, query: &str, threshold: f64) -> Option<FuzzyMatch> {
        let state = self.state.read();

        let mut best: Option<(&String, f64)> = None;
        for key in &state.keys {
            let score = similarity_ratio(query, key);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((key, score));
            }
        }

        best.filter(|(_, score)| accepts(*score, threshold))
            .map(|(key, score)| FuzzyMatch {
                key: key.clone(),
                score,
            })
    }
}

impl std::fmt::Debug for FuzzyIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzyIndex")
            .field("keys", &self.len())
            .finish()
    }
}
