//! Bitpacked hypervector and the VSA algebra over it.
//!
//! A [`HyperVector`] is a fixed-dimension binary vector stored as packed
//! 64-bit words. Bits at positions `dims..` in the final word are always
//! zero (the padding invariant); every constructor and operation preserves
//! it. Two vectors are only comparable when they share a dimension.
//!
//! The algebra is the classic binary VSA triple:
//!
//! | Operation | Realization | Role |
//! |-----------|-------------|------|
//! | [`HyperVector::bundle`] | bitwise majority vote | superposition |
//! | [`HyperVector::bind`] | bitwise XOR | association |
//! | [`HyperVector::similarity`] | normalized Hamming | comparison |
//!
//! Bind is commutative and self-inverse (`bind(bind(a, b), b) == a`);
//! two independently drawn random vectors sit near similarity 0.5.

use super::ops;
use crate::error::{CoreError, CoreResult};

/// A fixed-dimension bitpacked hypervector.
///
/// Immutable after construction; [`Clone`] produces an independent copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperVector {
    dims: usize,
    words: Vec<u64>,
}

impl HyperVector {
    /// Create the all-zero vector of the given dimension.
    ///
    /// # Errors
    /// `CoreError::Config` if `dims` is zero.
    pub fn new(dims: usize) -> CoreResult<Self> {
        if dims == 0 {
            return Err(CoreError::config("dims must be positive"));
        }
        Ok(Self {
            dims,
            words: vec![0; ops::num_words(dims)],
        })
    }

    /// Construct a vector from a raw word slice.
    ///
    /// The slice is copied; padding bits above `dims - 1` are zeroed.
    ///
    /// # Errors
    /// - `CoreError::Config` if `dims` is zero.
    /// - `CoreError::BufferLength` if the slice length is not `ceil(dims/64)`.
    pub fn from_words(dims: usize, words: &[u64]) -> CoreResult<Self> {
        if dims == 0 {
            return Err(CoreError::config("dims must be positive"));
        }
        let needed = ops::num_words(dims);
        if words.len() != needed {
            return Err(CoreError::BufferLength {
                expected: needed,
                actual: words.len(),
            });
        }
        let mut copied = words.to_vec();
        ops::zero_padding(&mut copied, dims);
        Ok(Self {
            dims,
            words: copied,
        })
    }

    /// Wrap an owned word buffer of the correct length without re-validating.
    ///
    /// Used by the encoder to hand a pooled buffer to the caller as the
    /// owning storage of the final result. Padding is still cleared.
    pub(crate) fn from_buf(dims: usize, mut words: Vec<u64>) -> Self {
        debug_assert_eq!(words.len(), ops::num_words(dims));
        ops::zero_padding(&mut words, dims);
        Self { dims, words }
    }

    /// The configured dimension.
    #[inline]
    #[must_use]
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// The packed word representation, little-endian bit order within words.
    #[inline]
    #[must_use]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Cyclic right shift of the bit sequence by one position:
    /// `out[i] = in[(i+1) mod dims]`.
    ///
    /// Bit 0 wraps around to position `dims - 1`; applying `permute` exactly
    /// `dims` times restores the original vector. Used to tag a symbol with
    /// its position inside an n-gram window.
    #[must_use]
    pub fn permute(&self) -> Self {
        let mut result = self.clone();
        ops::permute_in_place(&mut result.words, self.dims);
        result
    }

    /// Majority-vote superposition of one or more vectors.
    ///
    /// Bit i of the result is set iff strictly more than half of the inputs
    /// have bit i set; with an even count, ties resolve to 0.
    ///
    /// # Errors
    /// - `CoreError::EmptyBundle` on an empty slice.
    /// - `CoreError::DimensionMismatch` if the inputs disagree on dimension.
    pub fn bundle(vecs: &[HyperVector]) -> CoreResult<Self> {
        let first = vecs.first().ok_or(CoreError::EmptyBundle)?;
        let dims = first.dims;
        for v in &vecs[1..] {
            if v.dims != dims {
                return Err(CoreError::DimensionMismatch {
                    expected: dims,
                    actual: v.dims,
                });
            }
        }

        let mut counts = vec![0i32; dims];
        for v in vecs {
            ops::accumulate_counts(&mut counts, &v.words, dims);
        }
        let mut words = vec![0u64; ops::num_words(dims)];
        ops::write_majority(&mut words, &counts, vecs.len(), dims);
        Ok(Self { dims, words })
    }

    /// Associate two vectors via XOR.
    ///
    /// Commutative and its own inverse: `a.bind(&b)?.bind(&b)? == a`.
    ///
    /// # Errors
    /// `CoreError::DimensionMismatch` if the dimensions disagree.
    pub fn bind(&self, other: &HyperVector) -> CoreResult<Self> {
        self.require_same_dims(other)?;
        let words = self
            .words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| a ^ b)
            .collect();
        Ok(Self {
            dims: self.dims,
            words,
        })
    }

    /// Number of bit positions where the two vectors differ.
    ///
    /// # Errors
    /// `CoreError::DimensionMismatch` if the dimensions disagree.
    pub fn hamming(&self, other: &HyperVector) -> CoreResult<u64> {
        self.require_same_dims(other)?;
        Ok(self.hamming_unchecked(other))
    }

    /// Normalized Hamming similarity in `[0.0, 1.0]`.
    ///
    /// 1.0 = identical, 0.0 = bitwise complement; two unrelated random
    /// vectors concentrate sharply around 0.5 at high dimension.
    ///
    /// # Errors
    /// `CoreError::DimensionMismatch` if the dimensions disagree.
    pub fn similarity(&self, other: &HyperVector) -> CoreResult<f64> {
        self.require_same_dims(other)?;
        Ok(self.similarity_unchecked(other))
    }

    /// Similarity without the dimension check, for scans over vectors that
    /// are guaranteed by construction to share one encoder's dimension.
    #[inline]
    pub(crate) fn similarity_unchecked(&self, other: &HyperVector) -> f64 {
        debug_assert_eq!(self.dims, other.dims);
        1.0 - self.hamming_unchecked(other) as f64 / self.dims as f64
    }

    #[inline]
    fn hamming_unchecked(&self, other: &HyperVector) -> u64 {
        self.words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a ^ b).count_ones() as u64)
            .sum()
    }

    #[inline]
    fn require_same_dims(&self, other: &HyperVector) -> CoreResult<()> {
        if self.dims != other.dims {
            return Err(CoreError::DimensionMismatch {
                expected: self.dims,
                actual: other.dims,
            });
        }
        Ok(())
    }
}
