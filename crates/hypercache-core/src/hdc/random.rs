//! Deterministic seeded hypervectors.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::ops;
use super::HyperVector;
use crate::error::{CoreError, CoreResult};

/// Fill a fresh word buffer for `dims` bits from the seeded stream.
///
/// The generator is ChaCha8, whose output stream is specified and stable
/// across platforms and `rand_chacha` releases, so the same `(dims, seed)`
/// pair always yields the same buffer.
pub(crate) fn random_words(dims: usize, seed: u64) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut words: Vec<u64> = (0..ops::num_words(dims)).map(|_| rng.next_u64()).collect();
    ops::zero_padding(&mut words, dims);
    words
}

impl HyperVector {
    /// Generate a deterministic pseudo-random vector for the given seed.
    ///
    /// The same `(dims, seed)` pair always produces the same vector; vectors
    /// from different seeds are quasi-orthogonal (similarity near 0.5) with
    /// overwhelming probability at high dimension.
    ///
    /// # Errors
    /// `CoreError::Config` if `dims` is zero.
    pub fn random(dims: usize, seed: u64) -> CoreResult<Self> {
        if dims == 0 {
            return Err(CoreError::config("dims must be positive"));
        }
        Ok(Self::from_buf(dims, random_words(dims, seed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_is_byte_identical() {
        let a = HyperVector::random(10_000, 42).unwrap();
        let b = HyperVector::random(10_000, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn padding_is_zero_after_generation() {
        let v = HyperVector::random(65, 3).unwrap();
        assert_eq!(v.words()[1] >> 1, 0);
    }

    #[test]
    fn different_seeds_are_quasi_orthogonal() {
        for seed in 0..10u64 {
            let a = HyperVector::random(10_000, seed).unwrap();
            let b = HyperVector::random(10_000, seed + 1000).unwrap();
            let s = a.similarity(&b).unwrap();
            assert!(
                (0.45..=0.55).contains(&s),
                "seeds {seed}/{}: similarity {s:.4} outside quasi-orthogonal band",
                seed + 1000
            );
        }
    }
}
