//! Embedded semantic cache backed by Hyperdimensional Computing.
//!
//! Keys are encoded to high-dimensional binary vectors; a lookup returns
//! the value stored under the most similar key at or above a configured
//! threshold. The crate is built for in-process use by applications that
//! repeatedly pose near-duplicate questions to an expensive backend such as
//! a language model. No server, no network, no index to build.
//!
//! # Architecture
//!
//! - [`hdc`]: bitpacked [`HyperVector`] and the bundle / bind / permute /
//!   similarity algebra, plus seeded random vectors and the scratch pool.
//! - [`encode`]: text normalization and the character n-gram
//!   [`NGramEncoder`].
//! - [`cache`]: the thread-safe [`SemanticCache`] with linear similarity
//!   scan and LRU eviction.
//! - [`HyperCache`]: the façade most applications use.
//!
//! Model-backed encoding lives in the companion `hypercache-embeddings`
//! crate; anything implementing [`Encoder`] plugs into
//! [`HyperCache::with_encoder`].
//!
//! # Example
//!
//! ```
//! use hypercache_core::{CacheOptions, HyperCache};
//!
//! let cache: HyperCache<String> = HyperCache::new(CacheOptions::default())?;
//! cache.set("hello world", "greeting".to_string());
//!
//! let hit = cache.get("hello world").expect("exact key must hit");
//! assert_eq!(hit.value, "greeting");
//! assert_eq!(hit.similarity, 1.0);
//! # Ok::<(), hypercache_core::CoreError>(())
//! ```

pub mod cache;
pub mod config;
pub mod encode;
pub mod error;
mod facade;
pub mod hdc;
pub mod traits;

pub use cache::{CacheStats, Hit, SemanticCache};
pub use config::{CacheConfig, CacheOptions, EncoderConfig};
pub use encode::NGramEncoder;
pub use error::{CoreError, CoreResult};
pub use facade::HyperCache;
pub use hdc::HyperVector;
pub use traits::Encoder;
