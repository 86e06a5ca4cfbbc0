//! Character n-gram text encoder.
//!
//! A string becomes a hypervector in four stages:
//!
//! 1. lowercase, split into sentences, normalize each segment;
//! 2. slide an N-code-point window over the sentence and build one vector
//!    per window by position-sensitive binding
//!    `w = sym(r_0) ⊕ ρ¹(sym(r_1)) ⊕ … ⊕ ρ^{N−1}(sym(r_{N−1}))`,
//!    where `ρ` is a one-bit cyclic permute; the permutation makes "hel"
//!    and "lhe" distinct;
//! 3. majority-bundle the window vectors (per-code-point fallback below N,
//!    overlapping chunks above the long-text threshold);
//! 4. majority-bundle the sentence vectors.
//!
//! The hot path works entirely in pooled scratch buffers: window vectors
//! are accumulated straight into a vote-counter buffer rather than
//! materialized, and the only allocation billed to a steady-state encode is
//! the word buffer of the returned vector.

use crate::config::EncoderConfig;
use crate::error::CoreResult;
use crate::hdc::{
    accumulate_counts, copy_from, num_words, permute_in_place, write_majority, xor_into,
    BufferPool, HyperVector,
};
use crate::traits::Encoder;

use super::normalize::{normalize_segment, split_sentences};
use super::symbols::SymbolTable;

/// Character n-gram encoder over hyperdimensional vectors.
///
/// Deterministic: the same configuration and input always produce a
/// byte-identical vector. Safe for concurrent use.
pub struct NGramEncoder {
    config: EncoderConfig,
    word_len: usize,
    symbols: SymbolTable,
    pool: BufferPool,
}

impl NGramEncoder {
    /// Create an encoder with the given configuration.
    ///
    /// # Errors
    /// `CoreError::Config` if any field is out of range (see
    /// [`EncoderConfig::validate`]).
    pub fn new(config: EncoderConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            word_len: num_words(config.dims),
            symbols: SymbolTable::new(config.dims, config.seed),
            pool: BufferPool::new(config.dims),
            config,
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    fn zero_vector(&self) -> HyperVector {
        HyperVector::from_buf(self.config.dims, vec![0; self.word_len])
    }

    /// Encode one normalized sentence given as a code-point slice.
    /// Returns a pooled word buffer owned by the caller.
    fn encode_runes(&self, runes: &[char]) -> Vec<u64> {
        let n = self.config.ngram_size;
        let dims = self.config.dims;

        if runes.len() < n {
            // Too short for a single window: bundle the bare symbol vectors.
            if runes.is_empty() {
                return self.pool.get_words();
            }
            let mut counts = self.pool.get_counts();
            for &c in runes {
                accumulate_counts(&mut counts, self.symbols.get(c).words(), dims);
            }
            let mut out = self.pool.get_words();
            write_majority(&mut out, &counts, runes.len(), dims);
            self.pool.put_counts(counts);
            return out;
        }

        let mut counts = self.pool.get_counts();
        let mut win = self.pool.get_words();
        let mut tmp = self.pool.get_words();

        let windows = runes.len() - n + 1;
        for i in 0..windows {
            copy_from(&mut win, self.symbols.get(runes[i]).words());
            for k in 1..n {
                copy_from(&mut tmp, self.symbols.get(runes[i + k]).words());
                for _ in 0..k {
                    permute_in_place(&mut tmp, dims);
                }
                xor_into(&mut win, &tmp);
            }
            accumulate_counts(&mut counts, &win, dims);
        }

        let mut out = self.pool.get_words();
        write_majority(&mut out, &counts, windows, dims);

        self.pool.put_words(tmp);
        self.pool.put_words(win);
        self.pool.put_counts(counts);
        out
    }

    /// Encode a long sentence as overlapping chunks (50% stride) and bundle
    /// the chunk vectors.
    ///
    /// Tail chunks shorter than the n-gram width are skipped: the preceding
    /// overlapping chunk already covers their content, and a sub-window
    /// chunk would only contribute per-code-point noise. The first chunk is
    /// always included regardless of length.
    fn encode_chunked(&self, runes: &[char]) -> Vec<u64> {
        let size = self.config.chunk_size;
        let stride = size / 2;

        let mut chunks: Vec<Vec<u64>> = Vec::new();
        let mut start = 0;
        loop {
            let end = (start + size).min(runes.len());
            let chunk = &runes[start..end];
            if chunk.len() >= self.config.ngram_size || chunks.is_empty() {
                chunks.push(self.encode_runes(chunk));
            }
            if end == runes.len() {
                break;
            }
            start += stride;
        }

        self.bundle_bufs(chunks)
    }

    /// Majority-bundle pooled buffers, recycling every input. A single
    /// buffer is returned unchanged.
    fn bundle_bufs(&self, mut bufs: Vec<Vec<u64>>) -> Vec<u64> {
        debug_assert!(!bufs.is_empty());
        if bufs.len() == 1 {
            return bufs.pop().expect("len checked above");
        }

        let dims = self.config.dims;
        let mut counts = self.pool.get_counts();
        for buf in &bufs {
            accumulate_counts(&mut counts, buf, dims);
        }
        let mut out = self.pool.get_words();
        write_majority(&mut out, &counts, bufs.len(), dims);

        self.pool.put_counts(counts);
        for buf in bufs {
            self.pool.put_words(buf);
        }
        out
    }
}

impl Encoder for NGramEncoder {
    fn dims(&self) -> usize {
        self.config.dims
    }

    /// Encode `text` into a hypervector.
    ///
    /// Empty input (or input that normalizes to nothing) returns the zero
    /// vector, which can never score above a positive cache threshold.
    fn encode(&self, text: &str) -> HyperVector {
        if text.is_empty() {
            return self.zero_vector();
        }

        // Lowercase before splitting so sentence delimiters are reliably
        // detected.
        let lowered = text.to_lowercase();
        let sentences = split_sentences(&lowered);

        let mut sentence_bufs: Vec<Vec<u64>> = Vec::with_capacity(sentences.len());
        for sentence in &sentences {
            let segment = normalize_segment(sentence, self.config.strip_punctuation);
            if segment.is_empty() {
                continue;
            }
            let runes: Vec<char> = segment.chars().collect();
            let buf = if runes.len() > self.config.long_text_thresh {
                self.encode_chunked(&runes)
            } else {
                self.encode_runes(&runes)
            };
            sentence_bufs.push(buf);
        }

        if sentence_bufs.is_empty() {
            return self.zero_vector();
        }
        let out = self.bundle_bufs(sentence_bufs);
        HyperVector::from_buf(self.config.dims, out)
    }
}
