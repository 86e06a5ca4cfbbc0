//! BERT weight tensors loaded from a safetensors file.

use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor};

use crate::error::{EmbeddingError, EmbeddingResult};

use super::config::BertConfig;

/// Embedding-layer weights.
#[derive(Debug)]
pub struct EmbeddingWeights {
    /// `[vocab_size, hidden_size]`
    pub word_embeddings: Tensor,
    /// `[max_position_embeddings, hidden_size]`
    pub position_embeddings: Tensor,
    /// `[type_vocab_size, hidden_size]`
    pub token_type_embeddings: Tensor,
    pub layer_norm_weight: Tensor,
    pub layer_norm_bias: Tensor,
}

/// Self-attention weights for one encoder layer.
#[derive(Debug)]
pub struct AttentionWeights {
    pub query_weight: Tensor,
    pub query_bias: Tensor,
    pub key_weight: Tensor,
    pub key_bias: Tensor,
    pub value_weight: Tensor,
    pub value_bias: Tensor,
    pub output_weight: Tensor,
    pub output_bias: Tensor,
    pub layer_norm_weight: Tensor,
    pub layer_norm_bias: Tensor,
}

/// Feed-forward weights for one encoder layer.
#[derive(Debug)]
pub struct FfnWeights {
    /// Up projection `[intermediate_size, hidden_size]` (PyTorch layout).
    pub intermediate_weight: Tensor,
    pub intermediate_bias: Tensor,
    /// Down projection `[hidden_size, intermediate_size]`.
    pub output_weight: Tensor,
    pub output_bias: Tensor,
    pub layer_norm_weight: Tensor,
    pub layer_norm_bias: Tensor,
}

/// One encoder layer.
#[derive(Debug)]
pub struct EncoderLayerWeights {
    pub attention: AttentionWeights,
    pub ffn: FfnWeights,
}

/// Complete BERT encoder weights.
#[derive(Debug)]
pub struct BertWeights {
    pub config: BertConfig,
    pub embeddings: EmbeddingWeights,
    pub encoder_layers: Vec<EncoderLayerWeights>,
    pub device: Device,
}

impl BertWeights {
    /// Load the tensors named by the standard HuggingFace BERT checkpoint
    /// layout from `model.safetensors`.
    ///
    /// # Errors
    /// `EmbeddingError::ModelLoad` when the file cannot be read or a tensor
    /// is missing or has an unexpected shape.
    pub fn load(path: &Path, config: BertConfig) -> EmbeddingResult<Self> {
        let device = Device::Cpu;
        let tensors = candle_core::safetensors::load(path, &device)
            .map_err(|e| EmbeddingError::model_load(format!("reading {}: {e}", path.display())))?;
        let loader = TensorMap {
            tensors,
            path: path.display().to_string(),
        };

        let embeddings = EmbeddingWeights {
            word_embeddings: loader.get(
                "embeddings.word_embeddings.weight",
                &[config.vocab_size, config.hidden_size],
            )?,
            position_embeddings: loader.get(
                "embeddings.position_embeddings.weight",
                &[config.max_position_embeddings, config.hidden_size],
            )?,
            token_type_embeddings: loader.get(
                "embeddings.token_type_embeddings.weight",
                &[config.type_vocab_size, config.hidden_size],
            )?,
            layer_norm_weight: loader.get("embeddings.LayerNorm.weight", &[config.hidden_size])?,
            layer_norm_bias: loader.get("embeddings.LayerNorm.bias", &[config.hidden_size])?,
        };

        let h = config.hidden_size;
        let inter = config.intermediate_size;
        let mut encoder_layers = Vec::with_capacity(config.num_hidden_layers);
        for i in 0..config.num_hidden_layers {
            let p = format!("encoder.layer.{i}");
            encoder_layers.push(EncoderLayerWeights {
                attention: AttentionWeights {
                    query_weight: loader.get(&format!("{p}.attention.self.query.weight"), &[h, h])?,
                    query_bias: loader.get(&format!("{p}.attention.self.query.bias"), &[h])?,
                    key_weight: loader.get(&format!("{p}.attention.self.key.weight"), &[h, h])?,
                    key_bias: loader.get(&format!("{p}.attention.self.key.bias"), &[h])?,
                    value_weight: loader.get(&format!("{p}.attention.self.value.weight"), &[h, h])?,
                    value_bias: loader.get(&format!("{p}.attention.self.value.bias"), &[h])?,
                    output_weight: loader
                        .get(&format!("{p}.attention.output.dense.weight"), &[h, h])?,
                    output_bias: loader.get(&format!("{p}.attention.output.dense.bias"), &[h])?,
                    layer_norm_weight: loader
                        .get(&format!("{p}.attention.output.LayerNorm.weight"), &[h])?,
                    layer_norm_bias: loader
                        .get(&format!("{p}.attention.output.LayerNorm.bias"), &[h])?,
                },
                ffn: FfnWeights {
                    intermediate_weight: loader
                        .get(&format!("{p}.intermediate.dense.weight"), &[inter, h])?,
                    intermediate_bias: loader
                        .get(&format!("{p}.intermediate.dense.bias"), &[inter])?,
                    output_weight: loader.get(&format!("{p}.output.dense.weight"), &[h, inter])?,
                    output_bias: loader.get(&format!("{p}.output.dense.bias"), &[h])?,
                    layer_norm_weight: loader.get(&format!("{p}.output.LayerNorm.weight"), &[h])?,
                    layer_norm_bias: loader.get(&format!("{p}.output.LayerNorm.bias"), &[h])?,
                },
            });
        }

        Ok(Self {
            config,
            embeddings,
            encoder_layers,
            device,
        })
    }
}

/// Name-keyed tensor lookup with shape verification and f32 coercion.
struct TensorMap {
    tensors: HashMap<String, Tensor>,
    path: String,
}

impl TensorMap {
    fn get(&self, name: &str, shape: &[usize]) -> EmbeddingResult<Tensor> {
        let tensor = self.tensors.get(name).ok_or_else(|| {
            EmbeddingError::model_load(format!("{}: missing tensor {name}", self.path))
        })?;
        if tensor.dims() != shape {
            return Err(EmbeddingError::model_load(format!(
                "{}: tensor {name} has shape {:?}, expected {shape:?}",
                self.path,
                tensor.dims()
            )));
        }
        tensor
            .to_dtype(DType::F32)
            .map_err(|e| EmbeddingError::model_load(format!("{name}: dtype conversion: {e}")))
    }
}
