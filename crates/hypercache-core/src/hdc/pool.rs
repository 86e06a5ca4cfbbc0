//! Scratch-buffer recycling for the encode hot path.
//!
//! Encoding one string needs a handful of temporary word buffers (window
//! vectors, permutation scratch) and one vote-counter buffer per bundle.
//! Recycling them keeps steady-state encode at a single allocation: the word
//! buffer of the returned vector, which is moved out of the pool instead of
//! being checked back in.
//!
//! Buffers are zeroed on *acquisition*, not on release, so a buffer returned
//! dirty can never leak bits into its next user.

use parking_lot::Mutex;

use super::ops;

/// Free lists of word and count buffers keyed to one `(dims, words)` pair.
///
/// Safe for use by concurrent encode calls.
pub(crate) struct BufferPool {
    dims: usize,
    word_len: usize,
    words: Mutex<Vec<Vec<u64>>>,
    counts: Mutex<Vec<Vec<i32>>>,
}

impl BufferPool {
    pub(crate) fn new(dims: usize) -> Self {
        Self {
            dims,
            word_len: ops::num_words(dims),
            words: Mutex::new(Vec::new()),
            counts: Mutex::new(Vec::new()),
        }
    }

    /// A zeroed word buffer of length `ceil(dims/64)`.
    pub(crate) fn get_words(&self) -> Vec<u64> {
        match self.words.lock().pop() {
            Some(mut buf) => {
                buf.fill(0);
                buf
            }
            None => vec![0; self.word_len],
        }
    }

    /// Return a word buffer for reuse. Contents are left untouched.
    pub(crate) fn put_words(&self, buf: Vec<u64>) {
        debug_assert_eq!(buf.len(), self.word_len);
        self.words.lock().push(buf);
    }

    /// A zeroed vote-counter buffer of length `dims`.
    pub(crate) fn get_counts(&self) -> Vec<i32> {
        match self.counts.lock().pop() {
            Some(mut buf) => {
                buf.fill(0);
                buf
            }
            None => vec![0; self.dims],
        }
    }

    /// Return a counter buffer for reuse. Contents are left untouched.
    pub(crate) fn put_counts(&self, buf: Vec<i32>) {
        debug_assert_eq!(buf.len(), self.dims);
        self.counts.lock().push(buf);
    }
}
