//! Error types for the transformer encoder pipeline.

use std::path::PathBuf;

use thiserror::Error;

use hypercache_core::CoreError;

/// Failures of the model-backed encoding pipeline.
///
/// Everything here surfaces at construction or through the fallible
/// [`embed`](crate::TransformerEncoder::embed) path; the infallible
/// `Encoder::encode` contract degrades failures to the zero vector.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Model directory or one of its required files does not exist.
    #[error("model resource not found: {path}")]
    ModelNotFound {
        /// The missing file or directory.
        path: PathBuf,
    },

    /// Model files exist but could not be parsed or are inconsistent.
    #[error("model load failed: {message}")]
    ModelLoad { message: String },

    /// Invalid encoder configuration value.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Vocabulary or tokenization failure.
    #[error("tokenization error: {message}")]
    Tokenization { message: String },

    /// The forward pass failed.
    #[error("inference error: {message}")]
    Inference { message: String },

    /// An embedding had the wrong dimensionality for the projector.
    #[error("invalid embedding dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    /// Underlying file I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the core vector algebra.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl EmbeddingError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        EmbeddingError::Config {
            message: message.into(),
        }
    }

    pub(crate) fn model_load(message: impl Into<String>) -> Self {
        EmbeddingError::ModelLoad {
            message: message.into(),
        }
    }
}

/// Result type alias for embedding operations.
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;
