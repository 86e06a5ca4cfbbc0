//! Point-in-time cache metrics.

use serde::{Deserialize, Serialize};

/// Snapshot of cache counters taken under the cache lock.
///
/// `hits + misses` equals the number of completed lookups; `sets` counts
/// completed stores. The two derived ratios are zero when their denominator
/// is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Current entry count.
    pub entries: usize,
    /// Lookups that returned a value.
    pub hits: u64,
    /// Lookups that found no entry above the threshold.
    pub misses: u64,
    /// Completed `set` calls.
    pub sets: u64,
    /// `hits / (hits + misses)`, or 0 before the first lookup.
    pub hit_rate: f64,
    /// Mean similarity over all hits, or 0 before the first hit.
    pub avg_sim_on_hit: f64,
}
