//! Lazy code-point-to-hypervector symbol table.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::hdc::{random_words, HyperVector};

/// Knuth's multiplicative hash constant, mixed with the encoder seed to give
/// each encoder namespace its own symbol space.
const MIX: u64 = 2_654_435_761;

/// Thread-safe lazy map from code point to a deterministic random vector.
///
/// Grows monotonically for the life of the encoder; entries are never
/// evicted. Readers do not exclude readers; a lookup that loses the race to
/// an insert simply finds the entry on the second check, and recomputation
/// would be harmless anyway because the vectors are pure functions of
/// `(dims, seed, code point)`.
pub(crate) struct SymbolTable {
    dims: usize,
    seed: u64,
    table: RwLock<HashMap<char, Arc<HyperVector>>>,
}

impl SymbolTable {
    /// `dims` must already be validated positive by the encoder constructor.
    pub(crate) fn new(dims: usize, seed: u64) -> Self {
        debug_assert!(dims > 0);
        Self {
            dims,
            seed,
            table: RwLock::new(HashMap::new()),
        }
    }

    /// The symbol vector for `c`, computing and caching it on first access.
    pub(crate) fn get(&self, c: char) -> Arc<HyperVector> {
        if let Some(v) = self.table.read().get(&c) {
            return Arc::clone(v);
        }

        let mut table = self.table.write();
        Arc::clone(table.entry(c).or_insert_with(|| {
            let seed = self.seed ^ (c as u64).wrapping_mul(MIX).wrapping_add(1);
            Arc::new(HyperVector::from_buf(
                self.dims,
                random_words(self.dims, seed),
            ))
        }))
    }
}
