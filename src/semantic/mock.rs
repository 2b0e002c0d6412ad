//! Scripted [`SemanticBackend`] with a call counter.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use super::{SemanticBackend, SemanticError, SemanticMatch, SemanticResult};
use crate::storage::FoodRecord;

enum Behavior {
    Answer {
        fallback: Option<(FoodRecord, f32)>,
        by_text: HashMap<String, (FoodRecord, f32)>,
    },
    Empty,
    Unavailable,
}

struct MockState {
    behavior: RwLock<Behavior>,
    calls: AtomicUsize,
}

/// Clones share the call counter.
#[derive(Clone)]
pub struct MockSemanticBackend {
    state: Arc<MockState>,
}

impl MockSemanticBackend {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            state: Arc::new(MockState {
                behavior: RwLock::new(behavior),
                calls: AtomicUsize::new(0),
            }),
        }
    }

    /// Answers every query with `record` at cosine `score`.
    pub fn returning(record: FoodRecord, score: f32) -> Self {
        Self::with_behavior(Behavior::Answer {
            fallback: Some((record, score)),
            by_text: HashMap::new(),
        })
    }

    /// Answers only the texts registered with [`with_answer`](Self::with_answer).
    pub fn scripted() -> Self {
        Self::with_behavior(Behavior::Answer {
            fallback: None,
            by_text: HashMap::new(),
        })
    }

    /// Registers an answer for one exact input text.
    pub fn with_answer(self, text: &str, record: FoodRecord, score: f32) -> Self {
        if let Behavior::Answer { by_text, .. } = &mut *self.state.behavior.write() {
            by_text.insert(text.to_string(), (record, score));
        }
        self
    }

    /// Behaves like an empty corpus.
    pub fn empty() -> Self {
        Self::with_behavior(Behavior::Empty)
    }

    /// Fails every query as unavailable.
    pub fn failing() -> Self {
        Self::with_behavior(Behavior::Unavailable)
    }

    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }
}

impl SemanticBackend for MockSemanticBackend {
    fn resolve(&self, text: &str) -> SemanticResult<SemanticMatch> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);

        match &*self.state.behavior.read() {
            Behavior::Answer { fallback, by_text } => by_text
                .get(text)
                .or(fallback.as_ref())
                .map(|(record, score)| SemanticMatch {
                    row: 0,
                    record: record.clone(),
                    score: *score,
                })
                .ok_or(SemanticError::EmptyCorpus),
            Behavior::Empty => Err(SemanticError::EmptyCorpus),
            Behavior::Unavailable => Err(SemanticError::Unavailable(
                "mock backend offline".to_string(),
            )),
        }
    }

    fn corpus_rows(&self) -> usize {
        match &*self.state.behavior.read() {
            Behavior::Answer { fallback, by_text } => {
                by_text.len() + usize::from(fallback.is_some())
            }
            Behavior::Empty | Behavior::Unavailable => 0,
        }
    }
}

impl std::fmt::Debug for MockSemanticBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSemanticBackend")
            .field("calls", &self.calls())
            .finish_non_exhaustive()
    }
}
