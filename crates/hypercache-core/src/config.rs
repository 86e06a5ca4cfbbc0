//! Configuration for the encoder, the cache and the façade.
//!
//! Every struct carries production defaults via [`Default`] and validates
//! itself in `validate()`; constructors call it and refuse to build any
//! state from an invalid value.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::{CoreError, CoreResult};

/// Default hypervector dimension.
pub const DEFAULT_DIMS: usize = 10_000;
/// Default n-gram window width in code points.
pub const DEFAULT_NGRAM_SIZE: usize = 3;
/// Default code-point count above which a sentence is encoded in chunks.
pub const DEFAULT_LONG_TEXT_THRESH: usize = 200;
/// Default chunk length in code points (chunks overlap by 50%).
pub const DEFAULT_CHUNK_SIZE: usize = 128;
/// Default minimum similarity for a cache hit.
pub const DEFAULT_THRESHOLD: f64 = 0.82;
/// Default maximum entry count before LRU eviction.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Parameters of an [`NGramEncoder`](crate::encode::NGramEncoder).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Hypervector dimension. Higher values buy accuracy with memory and CPU.
    pub dims: usize,
    /// Sliding-window width in code points. Larger windows are more precise
    /// but less typo-tolerant.
    pub ngram_size: usize,
    /// Drop punctuation code points during normalization.
    pub strip_punctuation: bool,
    /// Code-point count above which a single sentence is encoded in chunks.
    pub long_text_thresh: usize,
    /// Code-point count per chunk; stride is half of this, so it must be >= 2.
    pub chunk_size: usize,
    /// Namespace seed for the symbol table. Encoders with different seeds
    /// produce mutually incompatible vectors.
    pub seed: u64,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            dims: DEFAULT_DIMS,
            ngram_size: DEFAULT_NGRAM_SIZE,
            strip_punctuation: false,
            long_text_thresh: DEFAULT_LONG_TEXT_THRESH,
            chunk_size: DEFAULT_CHUNK_SIZE,
            seed: 0,
        }
    }
}

impl EncoderConfig {
    /// Check every field against its allowed range.
    ///
    /// # Errors
    /// `CoreError::Config` naming the first offending field.
    pub fn validate(&self) -> CoreResult<()> {
        if self.dims == 0 {
            error!("encoder config rejected: dims must be positive");
            return Err(CoreError::config("dims must be positive"));
        }
        if self.ngram_size == 0 {
            error!("encoder config rejected: ngram_size must be positive");
            return Err(CoreError::config("ngram_size must be positive"));
        }
        if self.chunk_size < 2 {
            error!("encoder config rejected: chunk_size must be >= 2");
            return Err(CoreError::config(
                "chunk_size must be >= 2 (stride is chunk_size / 2)",
            ));
        }
        if self.long_text_thresh == 0 {
            error!("encoder config rejected: long_text_thresh must be positive");
            return Err(CoreError::config("long_text_thresh must be positive"));
        }
        Ok(())
    }
}

/// Parameters of a [`SemanticCache`](crate::cache::SemanticCache).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Minimum similarity for a hit, in `(0.0, 1.0]`.
    pub threshold: f64,
    /// Maximum entry count before the least-recently-used entry is evicted.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Check both fields against their allowed ranges.
    ///
    /// # Errors
    /// `CoreError::Config` naming the offending field.
    pub fn validate(&self) -> CoreResult<()> {
        if self.capacity == 0 {
            error!("cache config rejected: capacity must be positive");
            return Err(CoreError::config("capacity must be positive"));
        }
        // Written so NaN also fails.
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            error!(
                threshold = self.threshold,
                "cache config rejected: threshold outside (0, 1]"
            );
            return Err(CoreError::config("threshold must be in (0, 1]"));
        }
        Ok(())
    }
}

/// Construction options for the [`HyperCache`](crate::HyperCache) façade:
/// the cache knobs plus the encoder knobs an embedding application is
/// expected to tune.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheOptions {
    /// Hypervector dimension (default 10 000).
    pub dims: usize,
    /// Minimum similarity for a hit (default 0.82).
    pub threshold: f64,
    /// Maximum entries before LRU eviction (default 1024).
    pub capacity: usize,
    /// Character n-gram window size (default 3).
    pub ngram_size: usize,
    /// Encoder namespace seed (default 0).
    pub seed: u64,
    /// Strip punctuation during key normalization. Useful for natural-
    /// language keys; leave off for code or structured keys.
    pub strip_punctuation: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            dims: DEFAULT_DIMS,
            threshold: DEFAULT_THRESHOLD,
            capacity: DEFAULT_CAPACITY,
            ngram_size: DEFAULT_NGRAM_SIZE,
            seed: 0,
            strip_punctuation: false,
        }
    }
}

impl CacheOptions {
    /// Split into the encoder and cache configs the façade wires together.
    pub(crate) fn split(&self) -> (EncoderConfig, CacheConfig) {
        (
            EncoderConfig {
                dims: self.dims,
                ngram_size: self.ngram_size,
                strip_punctuation: self.strip_punctuation,
                long_text_thresh: DEFAULT_LONG_TEXT_THRESH,
                chunk_size: DEFAULT_CHUNK_SIZE,
                seed: self.seed,
            },
            CacheConfig {
                threshold: self.threshold,
                capacity: self.capacity,
            },
        )
    }
}
