use std::path::Path;

use candle_core::{self as candle, DType, Device, Result, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};

/// BERT sentence encoder: token embeddings averaged over the sequence.
pub(crate) struct BertSentenceEncoder {
    bert: BertModel,
    hidden_size: usize,
}

impl BertSentenceEncoder {
    /// Loads `config.json` and `model.safetensors` from `model_dir`.
    pub(crate) fn load(model_dir: &Path, device: &Device) -> Result<Self> {
        let config_content = std::fs::read_to_string(model_dir.join("config.json"))?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let weights_path = model_dir.join("model.safetensors");
        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        // sentence-transformers exports sometimes keep the "bert." prefix.
        let bert = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &config)?
        } else {
            BertModel::load(vb, &config)?
        };

        Ok(Self {
            bert,
            hidden_size: config.hidden_size,
        })
    }

    pub(crate) fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Returns the mean-pooled `[hidden_size]` vector for one token sequence.
    pub(crate) fn encode(&self, tokens: &[u32], device: &Device) -> Result<Vec<f32>> {
        let input_ids = Tensor::new(tokens, device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;
        let attention_mask = input_ids.ones_like()?;

        // [1, seq_len, hidden]
        let hidden = self
            .bert
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        let (_, seq_len, _) = hidden.dims3()?;
        let pooled = (hidden.sum(1)? / seq_len as f64)?;

        pooled.squeeze(0)?.to_dtype(DType::F32)?.to_vec1::<f32>()
    }
}
