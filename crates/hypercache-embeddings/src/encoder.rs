//! The transformer-backed [`Encoder`] implementation.

use std::path::Path;

use parking_lot::Mutex;
use tracing::{info, warn};

use hypercache_core::{Encoder, HyperVector};

use crate::config::{TransformerConfig, MODEL_CONFIG_FILE, MODEL_VOCAB_FILE, MODEL_WEIGHTS_FILE};
use crate::error::{EmbeddingError, EmbeddingResult};
use crate::model::{self, BertConfig, BertWeights};
use crate::projection::{l2_normalize, Projector};
use crate::tokenizer::WordPieceTokenizer;

/// Text encoder backed by a local BERT-style sentence-embedding model.
///
/// The pipeline is WordPiece tokenization, transformer inference, mean
/// pooling over non-padding tokens, L2 normalization, and random-hyperplane
/// projection into the HDC space. Compared to the n-gram encoder it
/// captures meaning beyond surface overlap ("who wrote X" vs "author of
/// X") at the cost of model inference per encode.
///
/// Construction fails when the model resource is unavailable; callers are
/// expected to fall back to the n-gram encoder or surface the error.
pub struct TransformerEncoder {
    weights: BertWeights,
    tokenizer: WordPieceTokenizer,
    projector: Projector,
    max_seq_len: usize,
    /// The forward pass is serialized; model backends are not assumed
    /// reentrant.
    infer_lock: Mutex<()>,
    zero: HyperVector,
}

impl TransformerEncoder {
    /// Load the model from the directory named by `config` (or the default
    /// locations) and build the full pipeline.
    ///
    /// # Errors
    /// - `EmbeddingError::Config` for out-of-range options;
    /// - `EmbeddingError::ModelNotFound` when the directory or a required
    ///   file is missing;
    /// - `EmbeddingError::ModelLoad` / `Tokenization` when a file is
    ///   malformed.
    pub fn new(config: TransformerConfig) -> EmbeddingResult<Self> {
        config.validate()?;
        let dir = config.resolve_model_dir()?;

        let weights_path = require_file(&dir, MODEL_WEIGHTS_FILE)?;
        let config_path = require_file(&dir, MODEL_CONFIG_FILE)?;
        let vocab_path = require_file(&dir, MODEL_VOCAB_FILE)?;

        let bert_config = BertConfig::from_file(&config_path)?;
        if config.max_seq_len > bert_config.max_position_embeddings {
            return Err(EmbeddingError::config(format!(
                "max_seq_len {} exceeds the model's max_position_embeddings {}",
                config.max_seq_len, bert_config.max_position_embeddings
            )));
        }

        let tokenizer = WordPieceTokenizer::from_vocab_file(&vocab_path)?;
        if tokenizer.vocab_size() != bert_config.vocab_size {
            warn!(
                vocab = tokenizer.vocab_size(),
                model = bert_config.vocab_size,
                "vocabulary size differs from model config"
            );
        }

        let hidden = bert_config.hidden_size;
        let weights = BertWeights::load(&weights_path, bert_config)?;
        let projector = Projector::new(hidden, config.binary_dims, config.projection_seed)?;
        let zero = HyperVector::new(config.binary_dims)?;

        info!(
            model = %weights_path.display(),
            hidden,
            layers = weights.config.num_hidden_layers,
            binary_dims = config.binary_dims,
            "transformer encoder loaded"
        );

        Ok(Self {
            weights,
            tokenizer,
            projector,
            max_seq_len: config.max_seq_len,
            infer_lock: Mutex::new(()),
            zero,
        })
    }

    /// The raw pooled and L2-normalized sentence embedding, before
    /// projection. Useful for diagnostics and for callers that project
    /// into their own space.
    ///
    /// # Errors
    /// `EmbeddingError::Inference` when the forward pass fails.
    pub fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let mut encoding = self.tokenizer.tokenize(text, self.max_seq_len);
        let seq_len = encoding.len();
        encoding.pad_to(self.max_seq_len, self.tokenizer.pad_id());

        let hidden = {
            let _guard = self.infer_lock.lock();
            model::encode(
                &self.weights,
                &encoding.input_ids,
                &encoding.attention_mask,
                &encoding.token_type_ids,
            )
            .map_err(|e| EmbeddingError::Inference {
                message: e.to_string(),
            })?
        };

        let mut pooled =
            model::mean_pool(&hidden, seq_len).map_err(|e| EmbeddingError::Inference {
                message: e.to_string(),
            })?;
        l2_normalize(&mut pooled);
        Ok(pooled)
    }
}

impl Encoder for TransformerEncoder {
    fn dims(&self) -> usize {
        self.projector.binary_dims()
    }

    fn encode(&self, text: &str) -> HyperVector {
        match self
            .embed(text)
            .and_then(|embedding| self.projector.project(&embedding))
        {
            Ok(vector) => vector,
            Err(err) => {
                // The Encoder contract is infallible; a zero vector cannot
                // score above a positive threshold, so this degrades to a miss.
                warn!(error = %err, "transformer encode failed, returning zero vector");
                self.zero.clone()
            }
        }
    }
}

fn require_file(dir: &Path, name: &str) -> EmbeddingResult<std::path::PathBuf> {
    let path = dir.join(name);
    if !path.is_file() {
        return Err(EmbeddingError::ModelNotFound { path });
    }
    Ok(path)
}
