//! Behavioral tests for the n-gram encoder: normalization, determinism,
//! similarity ordering, chunking, Unicode, seeds and pool hygiene.

use std::thread;

use hypercache_core::{Encoder, EncoderConfig, HyperVector, NGramEncoder};

fn default_encoder() -> NGramEncoder {
    NGramEncoder::new(EncoderConfig::default()).unwrap()
}

fn assert_near_half(label: &str, s: f64) {
    assert!(
        (0.45..=0.55).contains(&s),
        "{label}: expected similarity ~0.5, got {s:.4}"
    );
}

// ---- normalization ---------------------------------------------------------

#[test]
fn case_variants_encode_identically() {
    let enc = default_encoder();
    assert_eq!(enc.encode("Hello World"), enc.encode("hello world"));
}

#[test]
fn whitespace_variants_encode_identically() {
    let enc = default_encoder();
    assert_eq!(enc.encode("hello   world"), enc.encode("hello world"));
}

#[test]
fn non_breaking_space_collapses_like_space() {
    let enc = default_encoder();
    assert_eq!(enc.encode("hello\u{00A0}world"), enc.encode("hello world"));
}

#[test]
fn stripped_punctuation_matches_clean_text() {
    let enc = NGramEncoder::new(EncoderConfig {
        strip_punctuation: true,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(enc.encode("hello, world!"), enc.encode("hello world"));
}

// ---- determinism and degenerate inputs -------------------------------------

#[test]
fn encode_is_deterministic() {
    let enc = default_encoder();
    let text = "the quick brown fox jumps over the lazy dog";
    let a = enc.encode(text);
    let b = enc.encode(text);
    assert_eq!(a.similarity(&b).unwrap(), 1.0);
    assert_eq!(a, b);
}

#[test]
fn empty_input_is_the_zero_vector() {
    let enc = default_encoder();
    let zero = HyperVector::new(enc.dims()).unwrap();
    assert_eq!(enc.encode(""), zero);
}

#[test]
fn single_code_point_has_configured_dims() {
    let enc = default_encoder();
    assert_eq!(enc.encode("a").dims(), EncoderConfig::default().dims);
}

#[test]
fn padding_bits_are_zero_in_every_returned_vector() {
    // 100 dims -> 2 words with 28 padding bits in the second.
    let enc = NGramEncoder::new(EncoderConfig {
        dims: 100,
        ..Default::default()
    })
    .unwrap();
    for text in ["hello world", "a", "", "many words in a sentence."] {
        let v = enc.encode(text);
        assert_eq!(v.words()[1] >> 36, 0, "padding dirty for {text:?}");
    }
}

// ---- similarity ordering ---------------------------------------------------

#[test]
fn rephrase_is_more_similar_than_unrelated() {
    let enc = default_encoder();
    let base = enc.encode("what is the capital of india");
    let rephrase = enc.encode("capital city of india");
    let unrelated = enc.encode("how do you bake a chocolate cake");

    let sim_rephrase = base.similarity(&rephrase).unwrap();
    let sim_unrelated = base.similarity(&unrelated).unwrap();
    assert!(
        sim_rephrase > sim_unrelated,
        "rephrase ({sim_rephrase:.4}) must beat unrelated ({sim_unrelated:.4})"
    );
}

#[test]
fn typo_variants_stay_highly_similar() {
    let enc = default_encoder();
    let s = enc
        .encode("colour")
        .similarity(&enc.encode("color"))
        .unwrap();
    assert!(s >= 0.65, "typo variants should be highly similar, got {s:.4}");
}

#[test]
fn same_template_beats_unrelated_text() {
    let enc = default_encoder();
    let a = enc.encode("what is the capital of india");
    let b = enc.encode("what is the capital of nepal");
    let c = enc.encode("how do you make pasta carbonara");

    let template = a.similarity(&b).unwrap();
    let unrelated = a.similarity(&c).unwrap();
    assert!(
        template > unrelated,
        "template ({template:.4}) must beat unrelated ({unrelated:.4})"
    );
}

// ---- multi-sentence --------------------------------------------------------

#[test]
fn shared_sentence_keeps_similarity_across_paragraphs() {
    let enc = default_encoder();
    let single = enc.encode("the cat sat on the mat");
    let multi = enc.encode("the cat sat on the mat. it was a warm afternoon.");
    let s = single.similarity(&multi).unwrap();
    assert!(s >= 0.60, "multi-sentence overlap too weak: {s:.4}");
}

#[test]
fn period_and_newline_delimiters_agree() {
    let enc = default_encoder();
    let a = enc.encode("first sentence. second sentence.");
    let b = enc.encode("first sentence\nsecond sentence");
    assert_eq!(a, b);
}

// ---- long text / chunking --------------------------------------------------

#[test]
fn chunked_encoding_is_deterministic() {
    let enc = default_encoder();
    let long = "the quick brown fox jumps over the lazy dog ".repeat(10);
    assert_eq!(enc.encode(&long), enc.encode(&long));
}

#[test]
fn repetition_stays_similar_to_the_phrase() {
    let enc = default_encoder();
    let short = "the quick brown fox jumps over the lazy dog";
    let long = format!("{} ", short).repeat(6); // > 200 code points, chunked
    let s = enc.encode(short).similarity(&enc.encode(&long)).unwrap();
    assert!(s >= 0.55, "chunked repetition lost similarity: {s:.4}");
}

// ---- unicode ---------------------------------------------------------------

#[test]
fn unicode_text_encodes_deterministically() {
    let enc = default_encoder();
    assert_eq!(enc.encode("日本語のテキスト"), enc.encode("日本語のテキスト"));
}

#[test]
fn different_scripts_are_quasi_orthogonal() {
    let enc = default_encoder();
    let latin = enc.encode("hello world");
    let kanji = enc.encode("日本語のテキスト");
    assert_near_half("different scripts", latin.similarity(&kanji).unwrap());
}

// ---- n-gram size variants --------------------------------------------------

#[test]
fn unigram_and_four_gram_encoders_are_deterministic() {
    for n in [1usize, 4] {
        let enc = NGramEncoder::new(EncoderConfig {
            ngram_size: n,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(enc.encode("hello"), enc.encode("hello"), "ngram_size={n}");
    }
}

// ---- seeds -----------------------------------------------------------------

#[test]
fn different_seeds_produce_incompatible_vectors() {
    let enc1 = NGramEncoder::new(EncoderConfig {
        seed: 1,
        ..Default::default()
    })
    .unwrap();
    let enc2 = NGramEncoder::new(EncoderConfig {
        seed: 2,
        ..Default::default()
    })
    .unwrap();
    assert_near_half(
        "same text, different seed",
        enc1.encode("hello world")
            .similarity(&enc2.encode("hello world"))
            .unwrap(),
    );
}

// ---- pool hygiene ----------------------------------------------------------

#[test]
fn repeated_encodes_recycle_without_drift() {
    let enc = default_encoder();
    let text = "what is the capital of india";
    let first = enc.encode(text);
    for i in 0..100 {
        assert_eq!(enc.encode(text), first, "iteration {i} drifted");
    }
}

#[test]
fn interleaved_texts_do_not_contaminate_each_other() {
    let enc = default_encoder();
    let texts = [
        "what is the capital of india",
        "how do you bake a chocolate cake",
        "explain quantum computing",
        "the quick brown fox jumps over the lazy dog",
    ];
    let refs: Vec<HyperVector> = texts.iter().map(|t| enc.encode(t)).collect();

    for round in 0..50 {
        for (i, text) in texts.iter().enumerate() {
            assert_eq!(
                enc.encode(text),
                refs[i],
                "round {round}, text {i}: pool contamination"
            );
        }
    }
}

#[test]
fn concurrent_encodes_agree_with_the_reference() {
    let enc = default_encoder();
    let text = "what is the capital of india";
    let reference = enc.encode(text);

    thread::scope(|s| {
        for _ in 0..10 {
            s.spawn(|| {
                for _ in 0..10 {
                    assert_eq!(enc.encode(text), reference);
                }
            });
        }
    });
}

#[test]
fn concurrent_mixed_texts_stay_deterministic() {
    let enc = default_encoder();
    let texts = [
        "the quick brown fox",
        "hello world",
        "semantic caching with hdc",
        "hyperdimensional computing",
    ];
    let refs: Vec<HyperVector> = texts.iter().map(|t| enc.encode(t)).collect();

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for (i, text) in texts.iter().enumerate() {
                    assert_eq!(enc.encode(text), refs[i]);
                }
            });
        }
    });
}
