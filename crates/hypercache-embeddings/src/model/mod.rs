//! BERT model loading and inference.

mod config;
mod forward;
mod weights;

pub use config::BertConfig;
pub use weights::BertWeights;

pub(crate) use forward::{encode, mean_pool};
