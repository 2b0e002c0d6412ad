use super::fuzzy::{FuzzyIndex, accepts, similarity_ratio};
use crate::constants::DEFAULT_FUZZY_THRESHOLD;

fn boundary_pair() -> (String, String) {
    ("a".repeat(20), format!("{}bbb", "a".repeat(17)))
}

#[test]
fn test_ratio_identical_and_disjoint() {
    assert_eq!(similarity_ratio("apple", "apple"), 100.0);
    assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
    assert_eq!(similarity_ratio("", ""), 100.0);
    assert_eq!(similarity_ratio("apple", ""), 0.0);
}

#[test]
fn test_ratio_is_symmetric() {
    let a = "peanutt buter";
    let b = "peanut butter";
    assert_eq!(similarity_ratio(a, b), similarity_ratio(b, a));
}

#[test]
fn test_ratio_typo() {
    let score = similarity_ratio("peanutt buter", "peanut butter");
    assert!((score - 92.307_69).abs() < 1e-3, "score was {score}");
}

#[test]
fn test_ratio_boundary_is_exactly_85() {
    let (a, b) = boundary_pair();
    assert_eq!(similarity_ratio(&a, &b), 85.0);
}

#[test]
fn test_accepts_is_inclusive() {
    assert!(accepts(85.0, 85.0));
    assert!(!accepts(84.999, 85.0));
}

#[test]
fn test_best_match_boundary_accepted() {
    let (a, b) = boundary_pair();
    let index = FuzzyIndex::from_keys([b.clone()]);

    let found = index.best_match(&a, 85.0).unwrap();
    assert_eq!(found.key, b);
    assert_eq!(found.score, 85.0);
}

#[test]
fn test_best_match_above_boundary_rejected() {
    let (a, b) = boundary_pair();
    let index = FuzzyIndex::from_keys([b]);
    assert!(index.best_match(&a, 85.001).is_none());
}

#[test]
fn test_best_match_picks_highest() {
    let index = FuzzyIndex::from_keys(["peanut oil", "peanut butter", "butter"]);
    let found = index.best_match("peanutt buter", DEFAULT_FUZZY_THRESHOLD).unwrap();
    assert_eq!(found.key, "peanut butter");
}

#[test]
fn test_best_match_tie_keeps_first_inserted() {
    let index = FuzzyIndex::from_keys(["ac", "ad"]);
    let found = index.best_match("ab", 0.0).unwrap();
    assert_eq!(found.key, "ac");
    assert_eq!(found.score, 50.0);
}

#[test]
fn test_best_match_empty_index() {
    let index = FuzzyIndex::new();
    assert!(index.best_match("anything", 0.0).is_none());
}

#[test]
fn test_insert_keeps_position() {
    let index = FuzzyIndex::new();
    assert!(index.insert("ac"));
    assert!(index.insert("ad"));
    assert!(!index.insert("ac"));
    assert_eq!(index.len(), 2);

    let found = index.best_match("ab", 0.0).unwrap();
    assert_eq!(found.key, "ac");
}

#[test]
fn test_replace_all_and_clear() {
    let index = FuzzyIndex::from_keys(["apple", "banana"]);
    index.replace_all(["cherry", "cherry", "date"]);
    assert_eq!(index.len(), 2);
    assert!(index.contains("cherry"));
    assert!(!index.contains("apple"));

    index.clear();
    assert!(index.is_empty());
}
