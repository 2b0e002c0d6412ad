use super::*;
use crate::corpus::{CorpusRow, EmbeddingCorpus};
use crate::embedding::{EmbedderConfig, SentenceEmbedder};

const DIM: usize = 16;

fn stub_embedder() -> Arc<SentenceEmbedder> {
    Arc::new(SentenceEmbedder::load(EmbedderConfig::stub_with_dim(DIM)).unwrap())
}

fn corpus_of(embedder: &SentenceEmbedder, names: &[&str]) -> Arc<EmbeddingCorpus> {
    let rows = names.iter().map(|n| embedder.embed(n).unwrap()).collect();
    let metadata = names
        .iter()
        .enumerate()
        .map(|(i, n)| CorpusRow::new(*n, None, format!("{i:04}")))
        .collect();
    Arc::new(EmbeddingCorpus::from_rows(DIM, rows, metadata).unwrap())
}

#[test]
fn test_resolve_returns_identical_row() {
    let embedder = stub_embedder();
    let corpus = corpus_of(&embedder, &["apple", "banana", "cheddar cheese"]);
    let resolver = SemanticResolver::new(embedder, corpus);

    let m = resolver.resolve("banana").unwrap();
    assert_eq!(m.row, 1);
    assert_eq!(m.record.canonical_name(), "banana");
    assert_eq!(m.record.external_code(), "0001");
    assert!((m.score - 1.0).abs() < 1e-4);
    assert!((m.confidence() - 1.0).abs() < 1e-4);
}

#[test]
fn test_resolve_is_deterministic() {
    let embedder = stub_embedder();
    let corpus = corpus_of(&embedder, &["apple", "banana", "cheddar cheese", "oats"]);
    let resolver = SemanticResolver::new(embedder, corpus);

    let first = resolver.resolve("granola bar").unwrap();
    let second = resolver.resolve("granola bar").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_resolve_empty_corpus() {
    let corpus = Arc::new(EmbeddingCorpus::new(DIM, vec![], vec![]).unwrap());
    let resolver = SemanticResolver::new(stub_embedder(), corpus);

    let err = resolver.resolve("apple").unwrap_err();
    assert!(matches!(err, SemanticError::EmptyCorpus));
    assert!(err.is_not_found());
}

#[test]
fn test_resolve_dimension_mismatch() {
    let corpus = Arc::new(
        EmbeddingCorpus::new(4, vec![1.0, 0.0, 0.0, 0.0], vec![CorpusRow::new("x", None, "1")])
            .unwrap(),
    );
    let resolver = SemanticResolver::new(stub_embedder(), corpus);

    let err = resolver.resolve("apple").unwrap_err();
    assert!(matches!(
        err,
        SemanticError::DimensionMismatch {
            query: DIM,
            corpus: 4
        }
    ));
    assert!(!err.is_not_found());
}

#[test]
fn test_nearest_row_first_wins_ties() {
    let corpus = EmbeddingCorpus::new(
        2,
        vec![0.0, 1.0, 1.0, 0.0, 1.0, 0.0],
        vec![
            CorpusRow::new("a", None, "1"),
            CorpusRow::new("b", None, "2"),
            CorpusRow::new("c", None, "3"),
        ],
    )
    .unwrap();

    let (row, score) = nearest_row(&[1.0, 0.0], &corpus).unwrap();
    assert_eq!(row, 1);
    assert!((score - 1.0).abs() < 1e-6);
}

#[test]
fn test_cosine_zero_norm() {
    assert_eq!(cosine_similarity(&[0.0, 0.0], 0.0, &[1.0, 0.0], 1.0), 0.0);
}

#[test]
fn test_negative_cosine_clamps_confidence() {
    let m = SemanticMatch {
        row: 0,
        record: FoodRecord::new("x", None, "1", 0.0),
        score: -0.4,
    };
    assert_eq!(m.confidence(), 0.0);
}

#[test]
fn test_mock_backend_counts_calls() {
    let mock = MockSemanticBackend::returning(FoodRecord::new("Tofu", None, "9", 0.8), 0.8);
    assert_eq!(mock.calls(), 0);

    let m = mock.resolve("bean curd").unwrap();
    assert_eq!(m.record.canonical_name(), "Tofu");
    assert_eq!(mock.calls(), 1);
    assert_eq!(mock.corpus_rows(), 1);
}

#[test]
fn test_mock_backend_scripted_and_failing() {
    let mock = MockSemanticBackend::scripted().with_answer(
        "pb",
        FoodRecord::new("Peanut butter", None, "3", 0.7),
        0.7,
    );
    assert!(mock.resolve("pb").is_ok());
    assert!(matches!(
        mock.resolve("other"),
        Err(SemanticError::EmptyCorpus)
    ));

    let failing = MockSemanticBackend::failing();
    assert!(matches!(
        failing.resolve("anything"),
        Err(SemanticError::Unavailable(_))
    ));
    assert_eq!(MockSemanticBackend::empty().corpus_rows(), 0);
}
