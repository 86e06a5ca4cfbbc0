//! Public façade wiring the encoder and cache together.

use std::sync::Arc;

use crate::cache::{CacheStats, Hit, SemanticCache};
use crate::config::CacheOptions;
use crate::encode::NGramEncoder;
use crate::error::CoreResult;
use crate::traits::Encoder;

/// An embedded semantic cache.
///
/// Keys are free-form text; a lookup returns the value stored under the key
/// whose meaning is closest to the query, provided the similarity clears
/// the configured threshold. Safe for concurrent use from any number of
/// threads.
///
/// # Example
///
/// ```
/// use hypercache_core::{CacheOptions, HyperCache};
///
/// let cache: HyperCache<&str> = HyperCache::new(CacheOptions {
///     threshold: 0.65,
///     ..Default::default()
/// })?;
///
/// cache.set("what is the capital of india", "Delhi");
/// let hit = cache.get("capital city of india").expect("semantic hit");
/// assert_eq!(hit.value, "Delhi");
/// # Ok::<(), hypercache_core::CoreError>(())
/// ```
pub struct HyperCache<V> {
    cache: SemanticCache<V>,
}

impl<V: Clone> HyperCache<V> {
    /// Create a cache with the built-in n-gram encoder.
    ///
    /// # Errors
    /// `CoreError::Config` if any option value is invalid.
    pub fn new(options: CacheOptions) -> CoreResult<Self> {
        let (encoder_config, cache_config) = options.split();
        let encoder = NGramEncoder::new(encoder_config)?;
        Ok(Self {
            cache: SemanticCache::new(Arc::new(encoder), cache_config)?,
        })
    }

    /// Create a cache around a caller-provided encoder.
    ///
    /// Use this to plug in a model-backed encoder or a synthetic one in
    /// tests; the encoder fields of `options` are ignored, the cache fields
    /// are validated as usual.
    ///
    /// # Errors
    /// `CoreError::Config` if the cache options are invalid.
    pub fn with_encoder(encoder: Arc<dyn Encoder>, options: CacheOptions) -> CoreResult<Self> {
        let (_, cache_config) = options.split();
        Ok(Self {
            cache: SemanticCache::new(encoder, cache_config)?,
        })
    }

    /// Store `value` under `key`, updating and promoting an existing exact
    /// key in place.
    pub fn set(&self, key: &str, value: V) {
        self.cache.set(key, value);
    }

    /// Look up the value under the most similar key at or above the
    /// threshold. `None` is a miss.
    pub fn get(&self, key: &str) -> Option<Hit<V>> {
        self.cache.get(key)
    }

    /// Remove the entry with the exact key string; returns whether one was
    /// removed.
    pub fn delete(&self, key: &str) -> bool {
        self.cache.delete(key)
    }

    /// Current number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Point-in-time snapshot of cache metrics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
