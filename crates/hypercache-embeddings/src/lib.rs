//! Transformer-backed encoding for hypercache.
//!
//! This crate provides [`TransformerEncoder`], an implementation of the
//! [`Encoder`](hypercache_core::Encoder) contract that replaces character
//! n-grams with sentence embeddings from a local BERT-style model:
//!
//! 1. WordPiece tokenization against the model vocabulary;
//! 2. transformer inference over the packed id tensors;
//! 3. mean pooling over non-padding tokens and L2 normalization;
//! 4. random-hyperplane projection to a binary hypervector.
//!
//! The model directory must contain `model.safetensors`, `config.json` and
//! `vocab.txt` (the all-MiniLM-L6-v2 checkpoint layout). Construction fails
//! when the resource is unavailable; fall back to the n-gram encoder in
//! that case.
//!
//! ```no_run
//! use std::sync::Arc;
//! use hypercache_core::{CacheOptions, HyperCache};
//! use hypercache_embeddings::{TransformerConfig, TransformerEncoder};
//!
//! let encoder = Arc::new(TransformerEncoder::new(TransformerConfig::default())?);
//! let cache: HyperCache<String> = HyperCache::with_encoder(encoder, CacheOptions::default())?;
//! cache.set("who wrote moby dick", "Herman Melville".to_string());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
mod encoder;
pub mod error;
pub mod model;
mod projection;
pub mod tokenizer;

pub use config::{default_model_dir, TransformerConfig};
pub use encoder::TransformerEncoder;
pub use error::{EmbeddingError, EmbeddingResult};
pub use projection::Projector;
pub use tokenizer::{Encoding, WordPieceTokenizer};
