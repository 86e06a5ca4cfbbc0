//! BERT-style WordPiece tokenization.
//!
//! The tokenizer is read-only after construction and safe to share across
//! threads. It implements the uncased BERT pipeline: lowercase, strip
//! combining marks, isolate punctuation into separate tokens, split on
//! whitespace, then greedy longest-match subword search with `##`
//! continuations.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use hypercache_core::encode::is_punctuation;

use crate::error::{EmbeddingError, EmbeddingResult};

const CLS_TOKEN: &str = "[CLS]";
const SEP_TOKEN: &str = "[SEP]";
const UNK_TOKEN: &str = "[UNK]";
const PAD_TOKEN: &str = "[PAD]";

/// WordPiece tokenizer over a fixed vocabulary.
#[derive(Debug)]
pub struct WordPieceTokenizer {
    vocab: HashMap<String, i64>,
    /// Longest token length in code points, capping the subword search.
    max_token_len: usize,
    cls_id: i64,
    sep_id: i64,
    unk_id: i64,
    pad_id: i64,
}

/// Output of [`WordPieceTokenizer::tokenize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    /// Token ids including the `[CLS]` / `[SEP]` frame.
    pub input_ids: Vec<i64>,
    /// 1 for real tokens, 0 for padding.
    pub attention_mask: Vec<i64>,
    /// All zero for single-segment input.
    pub token_type_ids: Vec<i64>,
}

impl Encoding {
    /// Sequence length before padding.
    #[must_use]
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    /// Whether the encoding holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    /// Pad with `[PAD]` (mask 0, type 0) up to exactly `n` positions.
    /// No-op when already at or beyond `n`.
    pub fn pad_to(&mut self, n: usize, pad_id: i64) {
        while self.input_ids.len() < n {
            self.input_ids.push(pad_id);
            self.attention_mask.push(0);
            self.token_type_ids.push(0);
        }
    }
}

impl WordPieceTokenizer {
    /// Build a tokenizer from vocabulary text: one token per line, the
    /// 0-based line number is the token id.
    ///
    /// # Errors
    /// `EmbeddingError::Tokenization` when a special token is missing from
    /// the vocabulary.
    pub fn from_vocab_text(text: &str) -> EmbeddingResult<Self> {
        let mut vocab = HashMap::new();
        let mut max_token_len = 0;
        for (i, line) in text.lines().enumerate() {
            let token = line.trim_end_matches('\r');
            if token.is_empty() {
                continue;
            }
            max_token_len = max_token_len.max(token.chars().count());
            vocab.insert(token.to_string(), i as i64);
        }

        let special = |name: &str| -> EmbeddingResult<i64> {
            vocab.get(name).copied().ok_or_else(|| {
                EmbeddingError::Tokenization {
                    message: format!("vocabulary is missing the {name} token"),
                }
            })
        };
        let cls_id = special(CLS_TOKEN)?;
        let sep_id = special(SEP_TOKEN)?;
        let unk_id = special(UNK_TOKEN)?;
        let pad_id = special(PAD_TOKEN)?;

        Ok(Self {
            cls_id,
            sep_id,
            unk_id,
            pad_id,
            max_token_len,
            vocab,
        })
    }

    /// Build a tokenizer from a `vocab.txt` file.
    ///
    /// # Errors
    /// `EmbeddingError::Io` on read failure, `EmbeddingError::Tokenization`
    /// on a malformed vocabulary.
    pub fn from_vocab_file(path: &Path) -> EmbeddingResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_vocab_text(&text)
    }

    /// The `[PAD]` token id, for padding the encoding to a fixed length.
    #[must_use]
    pub fn pad_id(&self) -> i64 {
        self.pad_id
    }

    /// Vocabulary size.
    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// Convert text into framed token ids.
    ///
    /// When `max_len > 0` the interior is truncated so the output, including
    /// the closing `[SEP]`, fits within `max_len` tokens.
    #[must_use]
    pub fn tokenize(&self, text: &str, max_len: usize) -> Encoding {
        let cleaned = self.preprocess(text);
        let mut ids = vec![self.cls_id];
        for word in cleaned.split_whitespace() {
            self.word_piece(word, &mut ids);
        }

        if max_len > 0 && ids.len() >= max_len {
            ids.truncate(max_len - 1);
        }
        ids.push(self.sep_id);

        let n = ids.len();
        Encoding {
            input_ids: ids,
            attention_mask: vec![1; n],
            token_type_ids: vec![0; n],
        }
    }

    /// Lowercase, strip combining marks, and put whitespace around
    /// punctuation so each mark becomes its own token.
    fn preprocess(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let mut out = String::with_capacity(lowered.len() + 32);

        for c in lowered.chars() {
            if is_combining_mark(c) {
                continue;
            }
            if is_punctuation(c) {
                out.push(' ');
                out.push(c);
                out.push(' ');
            } else if c.is_whitespace() || is_control(c) {
                out.push(' ');
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Greedy longest-match subword split of one whitespace-delimited word.
    /// Appends token ids to `ids`; an unsplittable word becomes `[UNK]`.
    fn word_piece(&self, word: &str, ids: &mut Vec<i64>) {
        if let Some(&id) = self.vocab.get(word) {
            ids.push(id);
            return;
        }

        let runes: Vec<char> = word.chars().collect();
        let mut pieces = Vec::new();
        let mut start = 0;

        while start < runes.len() {
            let mut end = runes.len().min(start + self.max_token_len);
            let mut found = false;
            while end > start {
                let mut candidate: String = runes[start..end].iter().collect();
                if start > 0 {
                    candidate.insert_str(0, "##");
                }
                if let Some(&id) = self.vocab.get(&candidate) {
                    pieces.push(id);
                    start = end;
                    found = true;
                    break;
                }
                end -= 1;
            }
            if !found {
                // No subword covers this position: the whole word is unknown.
                ids.push(self.unk_id);
                return;
            }
        }

        ids.extend(pieces);
    }
}

/// Combining marks to drop during preprocessing (the common combining-mark
/// blocks; matches uncased BERT accent stripping for precomposed text).
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}'
        | '\u{1AB0}'..='\u{1AFF}'
        | '\u{1DC0}'..='\u{1DFF}'
        | '\u{20D0}'..='\u{20FF}'
        | '\u{FE20}'..='\u{FE2F}'
    )
}

/// Control characters other than the whitespace trio.
fn is_control(c: char) -> bool {
    if matches!(c, '\t' | '\n' | '\r') {
        return false;
    }
    c.is_control()
}
