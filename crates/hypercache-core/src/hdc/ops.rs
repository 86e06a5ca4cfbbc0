//! In-place word-level operations backing the pooled encode path.
//!
//! Every function here must be bit-identical to its pure counterpart on
//! [`HyperVector`](super::HyperVector); the tests at the bottom assert that
//! equivalence. Callers guarantee that all buffers belong to the same
//! dimensionality, so none of these re-validate.

/// Number of 64-bit words needed to hold `dims` bits.
#[inline]
pub(crate) fn num_words(dims: usize) -> usize {
    dims.div_ceil(64)
}

/// Zero every bit at position `dims` and above in the final word.
#[inline]
pub(crate) fn zero_padding(words: &mut [u64], dims: usize) {
    let rem = dims % 64;
    if rem != 0 {
        if let Some(last) = words.last_mut() {
            *last &= (1u64 << rem) - 1;
        }
    }
}

/// Cyclic right shift of the bit sequence by one position, in place:
/// `out[i] = in[(i+1) mod dims]`. Bit 0 wraps to position `dims - 1`.
pub(crate) fn permute_in_place(words: &mut [u64], dims: usize) {
    let w = words.len();
    debug_assert_eq!(w, num_words(dims));

    let bit0 = words[0] & 1;
    for i in 0..w - 1 {
        words[i] = (words[i] >> 1) | ((words[i + 1] & 1) << 63);
    }
    let high_bit = ((dims - 1) % 64) as u32;
    words[w - 1] = (words[w - 1] >> 1) | (bit0 << high_bit);
}

/// XOR `src` into `dst`.
#[inline]
pub(crate) fn xor_into(dst: &mut [u64], src: &[u64]) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// Overwrite `dst` with `src`.
#[inline]
pub(crate) fn copy_from(dst: &mut [u64], src: &[u64]) {
    debug_assert_eq!(dst.len(), src.len());
    dst.copy_from_slice(src);
}

/// Add the set bits of `words` into the per-position vote counters.
pub(crate) fn accumulate_counts(counts: &mut [i32], words: &[u64], dims: usize) {
    debug_assert_eq!(counts.len(), dims);
    for (w, &word) in words.iter().enumerate() {
        let base = w * 64;
        let limit = 64.min(dims - base);
        for b in 0..limit {
            counts[base + b] += ((word >> b) & 1) as i32;
        }
    }
}

/// Write the majority vote of `k` accumulated vectors into `dst`.
///
/// Bit i is set iff strictly more than half of the `k` inputs had it set;
/// even-count ties resolve to 0. `dst` is fully overwritten, padding stays
/// zero.
pub(crate) fn write_majority(dst: &mut [u64], counts: &[i32], k: usize, dims: usize) {
    debug_assert_eq!(counts.len(), dims);
    let threshold = (k / 2) as i32;

    dst.fill(0);
    for (i, &c) in counts.iter().enumerate() {
        if c > threshold {
            dst[i / 64] |= 1 << (i % 64);
        }
    }
}
