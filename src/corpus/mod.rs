//! Immutable embedding corpus used by the semantic tier.
//!
//! Two files produced by the offline batch job:
//! - a `.npy` `rows × dim` float matrix of L2-normalized product-name embeddings;
//! - a JSON Lines file with one `{product_name, nutriments, code}` object per row.
//!
//! Row `i` of the matrix describes row `i` of the metadata. A count mismatch
//! refuses to load.

mod error;


pub use error::{CorpusError, CorpusResult};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use candle_core::{DType, Tensor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{info, instrument};

use crate::storage::FoodRecord;

/// Metadata describing one corpus row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CorpusRow {
    pub product_name: String,
    /// Nutrient map; a one-element list (as some dataset exports store it) is unwrapped.
    #[serde(default, deserialize_with = "deserialize_nutriments")]
    pub nutriments: Option<Value>,
    /// Product code; numeric codes are kept as their decimal text.
    #[serde(deserialize_with = "deserialize_code")]
    pub code: String,
}

impl CorpusRow {
    pub fn new(
        product_name: impl Into<String>,
        nutriments: Option<Value>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            nutriments: nutriments.and_then(unwrap_nutriments),
            code: code.into(),
        }
    }

    /// Builds the record this row resolves to, tagged with `score`.
    pub fn to_record(&self, score: f32) -> FoodRecord {
        FoodRecord::new(
            self.product_name.clone(),
            self.nutriments.clone(),
            self.code.clone(),
            score,
        )
    }
}

fn unwrap_nutriments(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(mut items) => {
            if items.is_empty() {
                None
            } else {
                unwrap_nutriments(items.swap_remove(0))
            }
        }
        other => Some(other),
    }
}

fn deserialize_nutriments<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(unwrap_nutriments))
}

fn deserialize_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "code must be a string or number, got {other}"
        ))),
    }
}

/// Row-major `rows × dim` vectors plus per-row metadata.
pub struct EmbeddingCorpus {
    dim: usize,
    vectors: Vec<f32>,
    norms: Vec<f32>,
    metadata: Vec<CorpusRow>,
}

impl EmbeddingCorpus {
    /// Builds a corpus from a flat row-major buffer.
    pub fn new(dim: usize, vectors: Vec<f32>, metadata: Vec<CorpusRow>) -> CorpusResult<Self> {
        if dim == 0 {
            return Err(CorpusError::ZeroDimension);
        }

        if vectors.len() % dim != 0 {
            let row = vectors.len() / dim;
            return Err(CorpusError::RaggedRow {
                row,
                expected: dim,
                actual: vectors.len() % dim,
            });
        }

        let rows = vectors.len() / dim;
        if rows != metadata.len() {
            return Err(CorpusError::RowCountMismatch {
                vectors: rows,
                metadata: metadata.len(),
            });
        }

        let norms = vectors
            .chunks_exact(dim)
            .map(|row| row.iter().map(|x| x * x).sum::<f32>().sqrt())
            .collect();

        Ok(Self {
            dim,
            vectors,
            norms,
            metadata,
        })
    }

    /// Builds a corpus from one vector per row; every row must have length `dim`.
    pub fn from_rows(
        dim: usize,
        rows: Vec<Vec<f32>>,
        metadata: Vec<CorpusRow>,
    ) -> CorpusResult<Self> {
        let mut flat = Vec::with_capacity(rows.len() * dim);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != dim {
                return Err(CorpusError::RaggedRow {
                    row,
                    expected: dim,
                    actual: values.len(),
                });
            }
            flat.extend(values);
        }
        Self::new(dim, flat, metadata)
    }

    /// Loads the `.npy` matrix and the JSONL metadata.
    #[instrument(skip_all, fields(vectors = %vectors_path.display(), metadata = %metadata_path.display()))]
    pub fn load(vectors_path: &Path, metadata_path: &Path) -> CorpusResult<Self> {
        for path in [vectors_path, metadata_path] {
            if !path.is_file() {
                return Err(CorpusError::MissingFile {
                    path: path.to_path_buf(),
                });
            }
        }

        let (dim, vectors) = read_vectors(vectors_path)?;
        let metadata = read_metadata(metadata_path)?;

        let corpus = Self::new(dim, vectors, metadata)?;
        info!(rows = corpus.len(), dim = corpus.dim(), "Embedding corpus loaded");
        Ok(corpus)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    /// Vector dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Vector of row `index`.
    pub fn vector(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.dim)?;
        self.vectors.get(start..start + self.dim)
    }

    /// Precomputed L2 norm of row `index`.
    pub fn norm(&self, index: usize) -> Option<f32> {
        self.norms.get(index).copied()
    }

    pub fn row(&self, index: usize) -> Option<&CorpusRow> {
        self.metadata.get(index)
    }

    /// Iterates `(vector, norm)` in row order.
    pub fn iter_vectors(&self) -> impl Iterator<Item = (&[f32], f32)> {
        self.vectors
            .chunks_exact(self.dim)
            .zip(self.norms.iter().copied())
    }
}

impl std::fmt::Debug for EmbeddingCorpus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingCorpus")
            .field("rows", &self.len())
            .field("dim", &self.dim)
            .finish()
    }
}

fn read_vectors(path: &Path) -> CorpusResult<(usize, Vec<f32>)> {
    let to_err = |e: candle_core::Error| CorpusError::Vectors {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let tensor = Tensor::read_npy(path).map_err(to_err)?;
    let tensor = tensor.to_dtype(DType::F32).map_err(to_err)?;

    let tensor = match tensor.rank() {
        1 => tensor.unsqueeze(0).map_err(to_err)?,
        2 => tensor,
        rank => {
            return Err(CorpusError::Vectors {
                path: path.to_path_buf(),
                reason: format!("expected a 2-D matrix, got rank {rank}"),
            });
        }
    };

    let (_, dim) = tensor.dims2().map_err(to_err)?;
    let flat = tensor
        .flatten_all()
        .and_then(|t| t.to_vec1::<f32>())
        .map_err(to_err)?;

    Ok((dim, flat))
}

fn read_metadata(path: &Path) -> CorpusResult<Vec<CorpusRow>> {
    let reader = BufReader::new(File::open(path)?);
    let mut rows = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let row: CorpusRow =
            serde_json::from_str(&line).map_err(|e| CorpusError::Metadata {
                line: idx + 1,
                reason: e.to_string(),
            })?;
        rows.push(row);
    }

    Ok(rows)
}
