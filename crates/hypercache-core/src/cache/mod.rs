//! Thread-safe semantic cache over hypervector similarity.
//!
//! Keys are encoded to hypervectors; a lookup scans every stored vector
//! linearly and returns the value under the most similar key at or above
//! the configured threshold. Eviction is least-recently-used; a hit and an
//! exact-key update both promote.
//!
//! # Concurrency
//!
//! One exclusive mutex guards the entry map and the counters. Encoding,
//! the expensive part of both `set` and `get`, always runs before the
//! lock is taken, so the critical section is the scan plus O(1) map
//! surgery.

mod entry;
mod stats;

pub use stats::CacheStats;

use std::sync::Arc;
use std::time::Instant;

use linked_hash_map::LinkedHashMap;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::error::CoreResult;
use crate::traits::Encoder;

use entry::CacheEntry;

/// A successful lookup: the stored value and the similarity that selected it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<V> {
    /// The value stored under the best-matching key.
    pub value: V,
    /// Similarity between the query and the matched key, in `[threshold, 1]`.
    pub similarity: f64,
}

/// Thread-safe semantic cache.
///
/// Values are opaque to the cache; it stores and returns them without
/// interpretation. Callers that want by-reference sharing of large values
/// use `Arc<T>` as `V`.
pub struct SemanticCache<V> {
    encoder: Arc<dyn Encoder>,
    threshold: f64,
    capacity: usize,
    inner: Mutex<Inner<V>>,
}

struct Inner<V> {
    /// Front = least recently used, back = most recently used. Doubles as
    /// the exact-key index.
    entries: LinkedHashMap<String, CacheEntry<V>>,
    hits: u64,
    misses: u64,
    sets: u64,
    sim_sum: f64,
}

impl<V: Clone> SemanticCache<V> {
    /// Create a cache that encodes keys with `encoder`.
    ///
    /// # Errors
    /// `CoreError::Config` if the threshold is outside `(0, 1]` or the
    /// capacity is zero.
    pub fn new(encoder: Arc<dyn Encoder>, config: CacheConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            encoder,
            threshold: config.threshold,
            capacity: config.capacity,
            inner: Mutex::new(Inner {
                entries: LinkedHashMap::new(),
                hits: 0,
                misses: 0,
                sets: 0,
                sim_sum: 0.0,
            }),
        })
    }

    /// Store `value` under `key`.
    ///
    /// If the exact key string is already present its value and vector are
    /// replaced in place and the entry is promoted to most-recently-used.
    /// Otherwise the least-recently-used entry is evicted first when the
    /// cache is at capacity.
    pub fn set(&self, key: &str, value: V) {
        let vector = self.encoder.encode(key); // outside the critical section

        let mut inner = self.inner.lock();
        inner.sets += 1;

        if let Some(entry) = inner.entries.get_refresh(key) {
            entry.value = value;
            entry.vector = vector;
            entry.stored_at = Instant::now();
            return;
        }

        if inner.entries.len() >= self.capacity {
            if let Some((evicted, _)) = inner.entries.pop_front() {
                debug!(key = %evicted, len = inner.entries.len(), "evicted lru entry");
            }
        }
        inner
            .entries
            .insert(key.to_string(), CacheEntry::new(vector, value));
    }

    /// Return the value stored under the most similar key at or above the
    /// threshold, together with that similarity.
    ///
    /// The scan visits entries from most to least recently used; among
    /// equally similar candidates the more recently used entry wins. The
    /// matched entry is promoted. `None` is a miss, not an error.
    pub fn get(&self, key: &str) -> Option<Hit<V>> {
        let query = self.encoder.encode(key); // outside the critical section

        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let mut best_key: Option<&String> = None;
        let mut best_sim = 0.0_f64;
        for (k, entry) in inner.entries.iter().rev() {
            let sim = query.similarity_unchecked(&entry.vector);
            if sim >= self.threshold && sim > best_sim {
                best_sim = sim;
                best_key = Some(k);
            }
        }

        let Some(best_key) = best_key.cloned() else {
            inner.misses += 1;
            trace!(query = %key, "semantic miss");
            return None;
        };

        inner.hits += 1;
        inner.sim_sum += best_sim;
        let entry = inner
            .entries
            .get_refresh(&best_key)
            .expect("best key found during scan is still present under the same lock");
        trace!(query = %key, matched = %best_key, similarity = best_sim, "semantic hit");
        Some(Hit {
            value: entry.value.clone(),
            similarity: best_sim,
        })
    }

    /// Remove the entry stored under the exact key string.
    ///
    /// The match is byte-exact against the string passed to [`set`]; keys
    /// that merely normalize to the same text do not match. Returns whether
    /// an entry was removed.
    ///
    /// [`set`]: SemanticCache::set
    pub fn delete(&self, key: &str) -> bool {
        self.inner.lock().entries.remove(key).is_some()
    }

    /// Current number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point-in-time snapshot of the cache counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let lookups = inner.hits + inner.misses;
        CacheStats {
            entries: inner.entries.len(),
            hits: inner.hits,
            misses: inner.misses,
            sets: inner.sets,
            hit_rate: if lookups > 0 {
                inner.hits as f64 / lookups as f64
            } else {
                0.0
            },
            avg_sim_on_hit: if inner.hits > 0 {
                inner.sim_sum / inner.hits as f64
            } else {
                0.0
            },
        }
    }
}
