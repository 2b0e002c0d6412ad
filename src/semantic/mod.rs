//! Semantic tier: nearest corpus row by cosine similarity.

mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use error::{SemanticError, SemanticResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSemanticBackend;

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::corpus::EmbeddingCorpus;
use crate::embedding::SentenceEmbedder;
use crate::storage::FoodRecord;

/// Best corpus row for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticMatch {
    /// Corpus row index.
    pub row: usize,
    /// Record built from the row's metadata.
    pub record: FoodRecord,
    /// Cosine similarity in `[-1, 1]`.
    pub score: f32,
}

impl SemanticMatch {
    /// Cosine rescaled to a confidence in `[0, 1]`; negative similarity counts as 0.
    pub fn confidence(&self) -> f32 {
        if self.score.is_nan() {
            0.0
        } else {
            self.score.clamp(0.0, 1.0)
        }
    }
}

/// Always answers (no threshold) unless the corpus is empty or encoding fails.
pub trait SemanticBackend: Send + Sync {
    fn resolve(&self, text: &str) -> SemanticResult<SemanticMatch>;

    /// Number of rows searchable by [`resolve`](Self::resolve).
    fn corpus_rows(&self) -> usize;
}

/// Sentence embedder plus brute-force cosine scan over the corpus.
#[derive(Debug, Clone)]
pub struct SemanticResolver {
    embedder: Arc<SentenceEmbedder>,
    corpus: Arc<EmbeddingCorpus>,
}

impl SemanticResolver {
    pub fn new(embedder: Arc<SentenceEmbedder>, corpus: Arc<EmbeddingCorpus>) -> Self {
        Self { embedder, corpus }
    }

    pub fn embedder(&self) -> &SentenceEmbedder {
        &self.embedder
    }

    pub fn corpus(&self) -> &EmbeddingCorpus {
        &self.corpus
    }
}

impl SemanticBackend for SemanticResolver {
    #[instrument(skip(self), fields(rows = self.corpus.len()))]
    fn resolve(&self, text: &str) -> SemanticResult<SemanticMatch> {
        if self.corpus.is_empty() {
            return Err(SemanticError::EmptyCorpus);
        }

        let query = self.embedder.embed(text)?;
        if query.len() != self.corpus.dim() {
            return Err(SemanticError::DimensionMismatch {
                query: query.len(),
                corpus: self.corpus.dim(),
            });
        }

        let (row, score) = nearest_row(&query, &self.corpus).ok_or(SemanticError::EmptyCorpus)?;

        let meta = self
            .corpus
            .row(row)
            .ok_or_else(|| SemanticError::Unavailable(format!("corpus row {row} missing")))?;

        debug!(row, score, product = %meta.product_name, "Semantic match");

        Ok(SemanticMatch {
            row,
            record: meta.to_record(score.clamp(0.0, 1.0)),
            score,
        })
    }

    fn corpus_rows(&self) -> usize {
        self.corpus.len()
    }
}

/// Cosine similarity; zero-norm vectors score 0.
pub fn cosine_similarity(a: &[f32], a_norm: f32, b: &[f32], b_norm: f32) -> f32 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (a_norm * b_norm)
}

/// Index and score of the most similar row; the first row wins ties.
pub fn nearest_row(query: &[f32], corpus: &EmbeddingCorpus) -> Option<(usize, f32)> {
    let query_norm = query.iter().map(|x| x * x).sum::<f32>().sqrt();

    let mut best: Option<(usize, f32)> = None;
    for (idx, (row, norm)) in corpus.iter_vectors().enumerate() {
        let score = cosine_similarity(query, query_norm, row, norm);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((idx, score));
        }
    }
    best
}
