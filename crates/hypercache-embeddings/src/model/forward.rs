//! BERT encoder forward pass on candle tensors.
//!
//! Everything in here returns `candle_core::Result`; the encoder converts
//! to the crate error at its boundary. The pass follows the reference BERT
//! architecture: token + position + type embeddings with layer norm, then
//! per layer multi-head self-attention with an additive mask and a GELU
//! feed-forward block, both post-norm with residuals.

use candle_core::{Result, Tensor, D};

use super::weights::{AttentionWeights, BertWeights, EncoderLayerWeights, FfnWeights};

/// Run the full encoder over one padded sequence.
///
/// `input_ids`, `attention_mask` and `token_type_ids` all have
/// `max_seq_len` entries; the output is `[1, max_seq_len, hidden_size]`.
pub fn encode(
    weights: &BertWeights,
    input_ids: &[i64],
    attention_mask: &[i64],
    token_type_ids: &[i64],
) -> Result<Tensor> {
    let device = &weights.device;
    let seq_len = input_ids.len();

    let input_ids = Tensor::from_slice(input_ids, (1, seq_len), device)?;
    let token_type_ids = Tensor::from_slice(token_type_ids, (1, seq_len), device)?;
    let mask: Vec<f32> = attention_mask.iter().map(|&m| m as f32).collect();
    let mask = Tensor::from_slice(&mask, (1, seq_len), device)?;

    let mut hidden = embed(weights, &input_ids, &token_type_ids, seq_len)?;
    let extended_mask = extended_attention_mask(&mask)?;

    for layer in &weights.encoder_layers {
        hidden = layer_forward(weights, layer, &hidden, &extended_mask)?;
    }
    Ok(hidden)
}

/// Token + position + type embeddings followed by layer norm.
fn embed(
    weights: &BertWeights,
    input_ids: &Tensor,
    token_type_ids: &Tensor,
    seq_len: usize,
) -> Result<Tensor> {
    let h = weights.config.hidden_size;
    let e = &weights.embeddings;

    let words = e
        .word_embeddings
        .index_select(&input_ids.flatten_all()?, 0)?
        .reshape((1, seq_len, h))?;

    let positions = Tensor::arange(0i64, seq_len as i64, &weights.device)?;
    let positions = e
        .position_embeddings
        .index_select(&positions, 0)?
        .reshape((1, seq_len, h))?;

    let types = e
        .token_type_embeddings
        .index_select(&token_type_ids.flatten_all()?, 0)?
        .reshape((1, seq_len, h))?;

    let summed = ((words + positions)? + types)?;
    layer_norm(
        &summed,
        &e.layer_norm_weight,
        &e.layer_norm_bias,
        weights.config.layer_norm_eps,
    )
}

/// One encoder layer: self-attention then feed-forward, each with residual
/// and post-layer-norm.
fn layer_forward(
    weights: &BertWeights,
    layer: &EncoderLayerWeights,
    hidden: &Tensor,
    extended_mask: &Tensor,
) -> Result<Tensor> {
    let attended = attention_forward(weights, &layer.attention, hidden, extended_mask)?;
    ffn_forward(weights, &layer.ffn, &attended)
}

fn attention_forward(
    weights: &BertWeights,
    attn: &AttentionWeights,
    hidden: &Tensor,
    extended_mask: &Tensor,
) -> Result<Tensor> {
    let config = &weights.config;
    let (_, seq_len, h) = hidden.dims3()?;
    let heads = config.num_attention_heads;
    let head_dim = config.head_dim();

    let split = |t: &Tensor| -> Result<Tensor> {
        t.reshape((1, seq_len, heads, head_dim))?
            .transpose(1, 2)?
            .contiguous()
    };

    let q = split(&linear(hidden, &attn.query_weight, &attn.query_bias)?)?;
    let k = split(&linear(hidden, &attn.key_weight, &attn.key_bias)?)?;
    let v = split(&linear(hidden, &attn.value_weight, &attn.value_bias)?)?;

    // [1, heads, seq, seq]
    let scores = q.matmul(&k.transpose(2, 3)?.contiguous()?)?;
    let scores = (scores * (1.0 / (head_dim as f64).sqrt()))?;
    let scores = scores.broadcast_add(extended_mask)?;
    let probs = softmax_last_dim(&scores)?;

    let context = probs
        .matmul(&v)?
        .transpose(1, 2)?
        .contiguous()?
        .reshape((1, seq_len, h))?;

    let output = linear(&context, &attn.output_weight, &attn.output_bias)?;
    layer_norm(
        &(output + hidden)?,
        &attn.layer_norm_weight,
        &attn.layer_norm_bias,
        config.layer_norm_eps,
    )
}

fn ffn_forward(weights: &BertWeights, ffn: &FfnWeights, hidden: &Tensor) -> Result<Tensor> {
    let up = linear(hidden, &ffn.intermediate_weight, &ffn.intermediate_bias)?.gelu_erf()?;
    let down = linear(&up, &ffn.output_weight, &ffn.output_bias)?;
    layer_norm(
        &(down + hidden)?,
        &ffn.layer_norm_weight,
        &ffn.layer_norm_bias,
        weights.config.layer_norm_eps,
    )
}

/// Dense layer with a PyTorch `[out, in]` weight: `x @ W^T + b`.
fn linear(x: &Tensor, weight: &Tensor, bias: &Tensor) -> Result<Tensor> {
    x.broadcast_matmul(&weight.t()?)?.broadcast_add(bias)
}

/// Layer normalization over the last dimension.
fn layer_norm(x: &Tensor, weight: &Tensor, bias: &Tensor, eps: f64) -> Result<Tensor> {
    let mean = x.mean_keepdim(D::Minus1)?;
    let centered = x.broadcast_sub(&mean)?;
    let var = centered.sqr()?.mean_keepdim(D::Minus1)?;
    let normalized = centered.broadcast_div(&(var + eps)?.sqrt()?)?;
    normalized.broadcast_mul(weight)?.broadcast_add(bias)
}

/// Numerically stable softmax over the last dimension.
fn softmax_last_dim(x: &Tensor) -> Result<Tensor> {
    let max = x.max_keepdim(D::Minus1)?;
    let exp = x.broadcast_sub(&max)?.exp()?;
    let sum = exp.sum_keepdim(D::Minus1)?;
    exp.broadcast_div(&sum)
}

/// Broadcastable additive mask: `[1, seq]` of 1/0 becomes `[1, 1, 1, seq]`
/// with 0 at attended positions and -10000 at padding.
fn extended_attention_mask(mask: &Tensor) -> Result<Tensor> {
    // (m - 1) * 10000: 0 where m = 1, -10000 where m = 0.
    mask.unsqueeze(1)?
        .unsqueeze(2)?
        .affine(10_000.0, -10_000.0)
}

/// Mean of the token vectors over the first `seq_len` positions, ignoring
/// padding, as a plain `Vec<f32>` of `hidden_size` entries.
pub fn mean_pool(hidden: &Tensor, seq_len: usize) -> Result<Vec<f32>> {
    hidden
        .narrow(1, 0, seq_len)?
        .mean(1)?
        .squeeze(0)?
        .to_vec1::<f32>()
}
