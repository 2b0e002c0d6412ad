//! Sentence embeddings for the semantic tier.
//!
//! [`SentenceEmbedder`] wraps a BERT sentence-transformers model (all-MiniLM-L6-v2
//! by default) and produces L2-normalized, mean-pooled vectors. Use
//! [`EmbedderConfig::stub`] for tests without model files.

/// Embedder configuration.
pub mod config;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
mod model;
/// Tokenizer loading and vector helpers.
pub mod utils;


pub use config::{EmbedderConfig, SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN};
pub use device::{device_label, select_device};
pub use error::{EmbeddingError, EmbeddingResult};

use std::sync::Arc;

use candle_core::Device;
use tracing::{debug, info, warn};

use model::BertSentenceEncoder;
use utils::{l2_normalize, load_tokenizer};

enum EmbedderBackend {
    Model {
        encoder: Arc<BertSentenceEncoder>,
        tokenizer: Arc<tokenizers::Tokenizer>,
        device: Device,
    },
    Stub,
}

/// Text → unit-length vector encoder.
pub struct SentenceEmbedder {
    backend: EmbedderBackend,
    config: EmbedderConfig,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field("backend", &self.backend_label())
            .field("embedding_dim", &self.config.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl SentenceEmbedder {
    /// Loads the embedder from a config (stub mode is supported).
    pub fn load(config: EmbedderConfig) -> EmbeddingResult<Self> {
        config.validate()?;

        if config.testing_stub {
            warn!(
                embedding_dim = config.embedding_dim,
                "Sentence embedder running in STUB mode (testing only)"
            );
            return Ok(Self {
                backend: EmbedderBackend::Stub,
                config,
            });
        }

        let device = select_device();
        debug!(device = device_label(&device), "Selected compute device");

        let tokenizer = load_tokenizer(&config.tokenizer_path(), config.max_seq_len).map_err(
            |e| EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            },
        )?;

        let encoder = BertSentenceEncoder::load(&config.model_dir, &device)
            .map_err(EmbeddingError::ModelLoadFailed)?;

        if encoder.hidden_size() != config.embedding_dim {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!(
                    "embedding_dim ({}) does not match model hidden_size ({})",
                    config.embedding_dim,
                    encoder.hidden_size()
                ),
            });
        }

        info!(
            model_dir = %config.model_dir.display(),
            embedding_dim = config.embedding_dim,
            max_seq_len = config.max_seq_len,
            device = device_label(&device),
            "Sentence model loaded"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                encoder: Arc::new(encoder),
                tokenizer: Arc::new(tokenizer),
                device,
            },
            config,
        })
    }

    /// Encodes one string into a unit-length vector of [`embedding_dim`](Self::embedding_dim).
    pub fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        match &self.backend {
            EmbedderBackend::Model {
                encoder,
                tokenizer,
                device,
            } => self.embed_with_model(text, encoder, tokenizer, device),
            EmbedderBackend::Stub => Ok(self.embed_stub(text)),
        }
    }

    fn embed_with_model(
        &self,
        text: &str,
        encoder: &BertSentenceEncoder,
        tokenizer: &tokenizers::Tokenizer,
        device: &Device,
    ) -> EmbeddingResult<Vec<f32>> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let mut tokens: Vec<u32> = encoding.get_ids().to_vec();
        if tokens.is_empty() {
            return Err(EmbeddingError::TokenizationFailed {
                reason: "input produced no tokens".to_string(),
            });
        }
        tokens.truncate(self.config.max_seq_len);

        debug!(
            text_len = text.len(),
            token_count = tokens.len(),
            "Generating embedding"
        );

        let mut embedding = encoder.encode(&tokens, device)?;

        l2_normalize(&mut embedding);
        Ok(embedding)
    }

    fn embed_stub(&self, text: &str) -> Vec<f32> {
        let digest = blake3::hash(text.as_bytes());
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&digest.as_bytes()[..8]);
        let mut state = u64::from_le_bytes(seed);

        let mut embedding = Vec::with_capacity(self.config.embedding_dim);
        for _ in 0..self.config.embedding_dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        l2_normalize(&mut embedding);
        embedding
    }

    /// Returns the configured output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub)
    }

    /// `"stub"` or the device the model runs on.
    pub fn backend_label(&self) -> &'static str {
        match &self.backend {
            EmbedderBackend::Model { device, .. } => device_label(device),
            EmbedderBackend::Stub => "stub",
        }
    }

    pub fn config(&self) -> &EmbedderConfig {
        &self.config
    }
}
