//! Error types for hypercache-core.
//!
//! One unified error enum covers the two failure families the crate can
//! produce:
//!
//! - construction errors ([`CoreError::Config`]): an invalid option value
//!   rejected before any state is built;
//! - contract violations ([`CoreError::DimensionMismatch`],
//!   [`CoreError::EmptyBundle`], [`CoreError::BufferLength`]): misuse of the
//!   vector algebra, surfaced synchronously.
//!
//! A semantic miss is never an error; `SemanticCache::get` reports it through
//! its return value.

use thiserror::Error;

/// Errors produced by the HDC engine, the encoder and the cache.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// Invalid configuration value rejected at construction.
    #[error("invalid configuration: {message}")]
    Config {
        /// Which option was rejected and why.
        message: String,
    },

    /// Two vectors of different dimensionality were combined.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Majority-vote bundling needs at least one input vector.
    #[error("bundle requires at least one vector")]
    EmptyBundle,

    /// A raw word buffer did not have the length implied by the dimension.
    #[error("word buffer length mismatch: expected {expected} words, got {actual}")]
    BufferLength { expected: usize, actual: usize },
}

impl CoreError {
    /// Shorthand for a [`CoreError::Config`] with a formatted message.
    pub(crate) fn config(message: impl Into<String>) -> Self {
        CoreError::Config {
            message: message.into(),
        }
    }
}

/// Result type alias for hypercache-core operations.
pub type CoreResult<T> = Result<T, CoreError>;
