//! Configuration and model-directory resolution for the transformer encoder.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::{EmbeddingError, EmbeddingResult};

/// Default maximum token sequence length (BERT convention).
pub const DEFAULT_MAX_SEQ_LEN: usize = 128;
/// Default binary hypervector dimension for the projection.
pub const DEFAULT_BINARY_DIMS: usize = 10_000;
/// Default seed for the random-hyperplane projection. Fixed so projections
/// stay comparable across restarts.
pub const DEFAULT_PROJECTION_SEED: u64 = 0xDB_CAFE;

/// Expected file names inside the model directory.
pub const MODEL_WEIGHTS_FILE: &str = "model.safetensors";
pub const MODEL_CONFIG_FILE: &str = "config.json";
pub const MODEL_VOCAB_FILE: &str = "vocab.txt";

/// Environment variable overriding the model directory.
pub const MODEL_DIR_ENV: &str = "HYPERCACHE_MODEL_DIR";

/// Parameters of a [`TransformerEncoder`](crate::TransformerEncoder).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerConfig {
    /// Directory holding `model.safetensors`, `config.json` and `vocab.txt`.
    /// `None` resolves through [`default_model_dir`].
    pub model_dir: Option<PathBuf>,
    /// Maximum token sequence length; longer inputs are truncated. Must be
    /// at least 3 to fit `[CLS]` and `[SEP]` around one content token.
    pub max_seq_len: usize,
    /// Output binary vector dimensionality.
    pub binary_dims: usize,
    /// Seed for hyperplane generation; same seed, same projection.
    pub projection_seed: u64,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            binary_dims: DEFAULT_BINARY_DIMS,
            projection_seed: DEFAULT_PROJECTION_SEED,
        }
    }
}

impl TransformerConfig {
    /// Check every field against its allowed range.
    ///
    /// # Errors
    /// `EmbeddingError::Config` naming the offending field.
    pub fn validate(&self) -> EmbeddingResult<()> {
        if self.max_seq_len < 3 {
            error!(
                max_seq_len = self.max_seq_len,
                "transformer config rejected: max_seq_len must be >= 3"
            );
            return Err(EmbeddingError::config(
                "max_seq_len must be >= 3 (room for [CLS] and [SEP])",
            ));
        }
        if self.binary_dims == 0 {
            error!("transformer config rejected: binary_dims must be positive");
            return Err(EmbeddingError::config("binary_dims must be positive"));
        }
        Ok(())
    }

    /// The model directory this config points at, resolved through the
    /// defaults when unset, and verified to exist.
    ///
    /// # Errors
    /// `EmbeddingError::ModelNotFound` when the directory does not exist.
    pub fn resolve_model_dir(&self) -> EmbeddingResult<PathBuf> {
        let dir = match &self.model_dir {
            Some(dir) => dir.clone(),
            None => default_model_dir(),
        };
        if !dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound { path: dir });
        }
        Ok(dir)
    }
}

/// The default model directory, checked in order:
///
/// 1. `$HYPERCACHE_MODEL_DIR`
/// 2. `$XDG_DATA_HOME/hypercache/models`
/// 3. `~/.local/share/hypercache/models`
#[must_use]
pub fn default_model_dir() -> PathBuf {
    if let Ok(dir) = env::var(MODEL_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    let data_home = env::var("XDG_DATA_HOME")
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    data_home.join("hypercache").join("models")
}
