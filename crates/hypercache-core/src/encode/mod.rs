//! Text-to-hypervector encoding: normalization, the lazy symbol table and
//! the character n-gram encoder.

mod ngram;
mod normalize;
mod symbols;

pub use ngram::NGramEncoder;
pub use normalize::is_punctuation;
