//! BERT model configuration parsed from the model directory's `config.json`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{EmbeddingError, EmbeddingResult};

fn default_type_vocab_size() -> usize {
    2
}

fn default_layer_norm_eps() -> f64 {
    1e-12
}

/// The subset of a HuggingFace BERT `config.json` the forward pass needs.
#[derive(Debug, Clone, Deserialize)]
pub struct BertConfig {
    pub vocab_size: usize,
    pub hidden_size: usize,
    pub num_hidden_layers: usize,
    pub num_attention_heads: usize,
    pub intermediate_size: usize,
    pub max_position_embeddings: usize,
    #[serde(default = "default_type_vocab_size")]
    pub type_vocab_size: usize,
    #[serde(default = "default_layer_norm_eps")]
    pub layer_norm_eps: f64,
}

impl BertConfig {
    /// Parse `config.json` and sanity-check the architecture fields.
    ///
    /// # Errors
    /// `EmbeddingError::Io` on read failure, `EmbeddingError::ModelLoad` on
    /// malformed or inconsistent values.
    pub fn from_file(path: &Path) -> EmbeddingResult<Self> {
        let text = fs::read_to_string(path)?;
        let config: BertConfig = serde_json::from_str(&text)
            .map_err(|e| EmbeddingError::model_load(format!("parsing {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> EmbeddingResult<()> {
        if self.hidden_size == 0 || self.num_attention_heads == 0 {
            return Err(EmbeddingError::model_load(
                "hidden_size and num_attention_heads must be positive",
            ));
        }
        if self.hidden_size % self.num_attention_heads != 0 {
            return Err(EmbeddingError::model_load(format!(
                "hidden_size {} is not divisible by num_attention_heads {}",
                self.hidden_size, self.num_attention_heads
            )));
        }
        if self.num_hidden_layers == 0 {
            return Err(EmbeddingError::model_load(
                "num_hidden_layers must be positive",
            ));
        }
        Ok(())
    }

    /// Per-head dimensionality.
    #[must_use]
    pub fn head_dim(&self) -> usize {
        self.hidden_size / self.num_attention_heads
    }
}
