//! Corpus and configuration fixtures for integration tests.

use std::io::Write;
use std::path::Path;

use candle_core::{Device, Tensor};
use forage::config::Config;
use forage::embedding::{EmbedderConfig, SentenceEmbedder};
use serde_json::json;

pub const FIXTURE_DIM: usize = 16;

pub const FIXTURE_FOODS: [&str; 4] = [
    "peanut butter",
    "greek yogurt",
    "rolled oats",
    "whole milk",
];

/// Writes a corpus whose vectors come from the stub embedder at [`FIXTURE_DIM`].
///
/// Only the first `metadata_rows` names get a metadata line.
#[derive(Debug, Clone)]
pub struct CorpusFixture {
    names: Vec<String>,
    metadata_rows: Option<usize>,
}

impl Default for CorpusFixture {
    fn default() -> Self {
        Self {
            names: FIXTURE_FOODS.iter().map(|s| s.to_string()).collect(),
            metadata_rows: None,
        }
    }
}

impl CorpusFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metadata_rows(mut self, rows: usize) -> Self {
        self.metadata_rows = Some(rows);
        self
    }

    /// Writes `embeddings.npy` and `metadata.jsonl` into `dir` and returns a config
    /// pointing at them with enrichment disabled.
    pub fn write(&self, dir: &Path) -> Config {
        let embedder = SentenceEmbedder::load(EmbedderConfig::stub_with_dim(FIXTURE_DIM))
            .expect("stub embedder");
        let flat: Vec<f32> = self
            .names
            .iter()
            .flat_map(|name| embedder.embed(name).expect("stub embed"))
            .collect();

        let vectors = dir.join("embeddings.npy");
        Tensor::from_vec(flat, (self.names.len(), FIXTURE_DIM), &Device::Cpu)
            .expect("tensor")
            .write_npy(&vectors)
            .expect("write npy");

        let metadata = dir.join("metadata.jsonl");
        let mut file = std::fs::File::create(&metadata).expect("create metadata");
        let rows = self.metadata_rows.unwrap_or(self.names.len());
        for (i, name) in self.names.iter().take(rows).enumerate() {
            let line = json!({
                "product_name": name,
                "nutriments": {"energy-kcal_100g": 100 + i},
                "code": format!("00{}", i),
            });
            writeln!(file, "{}", line).expect("write metadata");
        }

        Config {
            port: 0,
            storage_path: dir.join("cache"),
            corpus_vectors: vectors,
            corpus_metadata: metadata,
            nutrition_url: None,
            ..Default::default()
        }
    }
}
