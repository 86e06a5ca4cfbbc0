//! Text normalization ahead of n-gram encoding.
//!
//! The input is lowercased by the caller before it reaches this module, so
//! sentence delimiters are reliably detected.

/// Split lowercased text into sentences at `.`, `?`, `!` and line feeds.
/// Delimiters are discarded; empty segments are dropped.
pub(crate) fn split_sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();

    for c in text.chars() {
        if matches!(c, '.' | '?' | '!' | '\n') {
            let trimmed = cur.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
            cur.clear();
        } else {
            cur.push(c);
        }
    }
    let trimmed = cur.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
    out
}

/// Collapse whitespace runs to a single ASCII space and optionally strip all
/// punctuation from an already-lowercased segment. Leading and trailing
/// spaces are trimmed.
pub(crate) fn normalize_segment(text: &str, strip_punct: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else if strip_punct && is_punctuation(c) {
            // dropped; deliberately does not reset prev_space
        } else {
            out.push(c);
            prev_space = false;
        }
    }

    out.trim().to_string()
}

/// Whether a code point counts as punctuation for normalization purposes.
///
/// Covers ASCII punctuation plus the common Unicode punctuation blocks
/// (Latin-1 supplement marks, general punctuation, CJK symbols, fullwidth
/// forms).
pub fn is_punctuation(c: char) -> bool {
    if c.is_ascii_punctuation() {
        return true;
    }
    matches!(c,
        '\u{00A1}' | '\u{00A7}' | '\u{00AB}' | '\u{00B6}' | '\u{00B7}' | '\u{00BB}' | '\u{00BF}'
        | '\u{2010}'..='\u{2027}'
        | '\u{2030}'..='\u{205E}'
        | '\u{3001}'..='\u{3003}'
        | '\u{3008}'..='\u{3011}'
        | '\u{3014}'..='\u{301F}'
        | '\u{FF01}'..='\u{FF0F}'
        | '\u{FF1A}'..='\u{FF20}'
        | '\u{FF3B}'..='\u{FF40}'
        | '\u{FF5B}'..='\u{FF65}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentences_split_on_all_delimiters() {
        assert_eq!(
            split_sentences("one. two? three! four\nfive"),
            vec!["one", "two", "three", "four", "five"]
        );
    }

    #[test]
    fn consecutive_delimiters_yield_no_empty_sentences() {
        assert_eq!(split_sentences("a..b?!c"), vec!["a", "b", "c"]);
        assert!(split_sentences("...").is_empty());
    }

    #[test]
    fn whitespace_runs_collapse_to_one_space() {
        assert_eq!(normalize_segment("hello   world", false), "hello world");
        assert_eq!(normalize_segment("hello\t \tworld", false), "hello world");
    }

    #[test]
    fn non_breaking_space_is_whitespace() {
        assert_eq!(normalize_segment("hello\u{00A0}world", false), "hello world");
    }

    #[test]
    fn punctuation_is_stripped_only_when_asked() {
        assert_eq!(normalize_segment("hello, world", true), "hello world");
        assert_eq!(normalize_segment("hello, world", false), "hello, world");
    }

    #[test]
    fn stripping_does_not_merge_words() {
        // "a-b" keeps the word boundary absent, exactly as written
        assert_eq!(normalize_segment("a-b", true), "ab");
        // but punctuation next to a space leaves one space
        assert_eq!(normalize_segment("a , b", true), "a b");
    }

    #[test]
    fn leading_and_trailing_space_trimmed() {
        assert_eq!(normalize_segment("  hello  ", false), "hello");
    }

    #[test]
    fn unicode_punctuation_recognized() {
        assert!(is_punctuation('\u{2014}')); // em dash
        assert!(is_punctuation('\u{3002}')); // ideographic full stop
        assert!(is_punctuation('\u{FF01}')); // fullwidth exclamation
        assert!(!is_punctuation('a'));
        assert!(!is_punctuation('\u{65E5}')); // CJK ideograph
    }
}
