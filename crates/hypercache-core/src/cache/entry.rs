//! Stored cache entry.

use std::time::Instant;

use crate::hdc::HyperVector;

/// One stored `(key, vector, value)` tuple.
///
/// The exact original key string lives as the map key; the entry keeps the
/// encoded vector, the opaque value and the time of the last `set`.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry<V> {
    pub(crate) vector: HyperVector,
    pub(crate) value: V,
    pub(crate) stored_at: Instant,
}

impl<V> CacheEntry<V> {
    pub(crate) fn new(vector: HyperVector, value: V) -> Self {
        Self {
            vector,
            value,
            stored_at: Instant::now(),
        }
    }
}
