use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::{Resolution, ResolverStats};

#[derive(Deserialize, Debug, Clone, Default)]
pub struct FoodLookupRequest {
    #[serde(default)]
    pub food_text: Option<String>,
    /// Per-request fuzzy threshold override (0–100).
    #[serde(default)]
    pub threshold: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FoodResult {
    pub product_name: String,
    /// Confidence as a percentage.
    pub similarity_score: f64,
    pub origin: String,
    pub code: String,
    pub nutrients: Option<Value>,
    /// Live nutrient data from the nutrition service, when available.
    pub macros: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FoodLookupResponse {
    pub status: String,
    pub message: String,
    pub food_text: String,
    pub result: FoodResult,
}

impl FoodLookupResponse {
    pub fn from_resolution(resolution: &Resolution, macros: Option<Value>) -> Self {
        let product_name = resolution.record.canonical_name().to_string();
        Self {
            status: "success".to_string(),
            message: format!("Received: {}", product_name),
            food_text: product_name.clone(),
            result: FoodResult {
                product_name,
                similarity_score: resolution.confidence_pct(),
                origin: resolution.origin.as_str().to_string(),
                code: resolution.record.external_code().to_string(),
                nutrients: resolution.record.nutrients().cloned(),
                macros,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsResponse {
    pub entries: usize,
    pub fuzzy_keys: usize,
    pub corpus_rows: usize,
}

impl From<ResolverStats> for StatsResponse {
    fn from(stats: ResolverStats) -> Self {
        Self {
            entries: stats.entries,
            fuzzy_keys: stats.fuzzy_keys,
            corpus_rows: stats.corpus_rows,
        }
    }
}
