//! Storage model types.

use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};

/// Canonical food a query resolved to.
///
/// Immutable once built; tiers hand out clones.
///
/// # Example
/// ```rust
/// use forage::FoodRecord;
///
/// let record = FoodRecord::new("Peanut butter", None, "3017620422003", 0.91);
/// assert_eq!(record.canonical_name(), "Peanut butter");
/// assert!(record.nutrients().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    canonical_name: String,
    nutrients: Option<serde_json::Value>,
    external_code: String,
    origin_score: f32,
}

impl FoodRecord {
    /// Builds a record; `origin_score` is clamped into `[0, 1]`.
    pub fn new(
        canonical_name: impl Into<String>,
        nutrients: Option<serde_json::Value>,
        external_code: impl Into<String>,
        origin_score: f32,
    ) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            nutrients: nutrients.filter(|n| !n.is_null()),
            external_code: external_code.into(),
            origin_score: clamp_unit(origin_score),
        }
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    /// Nutrient payload, absent for products without nutrition data.
    pub fn nutrients(&self) -> Option<&serde_json::Value> {
        self.nutrients.as_ref()
    }

    /// Product code in the external nutrition database.
    pub fn external_code(&self) -> &str {
        &self.external_code
    }

    /// Score of the lookup that produced this record, in `[0, 1]`.
    pub fn origin_score(&self) -> f32 {
        self.origin_score
    }
}

/// One row of the exact-match table.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Normalized query key (unique).
    pub query_key: String,
    /// Record the key resolves to.
    pub record: FoodRecord,
    /// Confidence in `[0, 1]` recorded at write time.
    pub confidence: f32,
    /// Unix timestamp when written.
    pub created_at: i64,
    /// Insertion sequence assigned by the exact-match store; kept across overwrites.
    pub seq: u64,
}

impl CacheEntry {
    pub fn new(query_key: impl Into<String>, record: FoodRecord, confidence: f32) -> Self {
        Self {
            query_key: query_key.into(),
            record,
            confidence: clamp_unit(confidence),
            created_at: chrono::Utc::now().timestamp(),
            seq: 0,
        }
    }
}

/// On-disk layout of a [`CacheEntry`] (rkyv archive).
///
/// The nutrient payload is kept as serialized JSON so arbitrary nutrient maps
/// survive without a fixed schema.
#[derive(Archive, RkyvDeserialize, RkyvSerialize, Debug, PartialEq, Clone)]
pub struct StoredEntry {
    pub query_key: String,
    pub canonical_name: String,
    pub nutrients_json: Option<String>,
    pub external_code: String,
    pub origin_score: f32,
    pub confidence: f32,
    pub created_at: i64,
    pub seq: u64,
}

impl StoredEntry {
    pub fn from_entry(entry: &CacheEntry) -> Result<Self, serde_json::Error> {
        let nutrients_json = entry
            .record
            .nutrients()
            .map(serde_json::to_string)
            .transpose()?;

        Ok(Self {
            query_key: entry.query_key.clone(),
            canonical_name: entry.record.canonical_name().to_string(),
            nutrients_json,
            external_code: entry.record.external_code().to_string(),
            origin_score: entry.record.origin_score(),
            confidence: entry.confidence,
            created_at: entry.created_at,
            seq: entry.seq,
        })
    }

    pub fn into_entry(self) -> Result<CacheEntry, serde_json::Error> {
        let nutrients = self
            .nutrients_json
            .as_deref()
            .map(serde_json::from_str::<serde_json::Value>)
            .transpose()?;

        Ok(CacheEntry {
            query_key: self.query_key,
            record: FoodRecord::new(
                self.canonical_name,
                nutrients,
                self.external_code,
                self.origin_score,
            ),
            confidence: self.confidence,
            created_at: self.created_at,
            seq: self.seq,
        })
    }
}

#[inline]
fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
