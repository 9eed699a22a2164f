//! docseek-text
//!
//! Query/document normalization built on tantivy's tokenizer pipeline and
//! Snowball stemmers. See `normalize` for the exact rules.

pub mod analyzer;
pub mod normalize;

pub use normalize::Normalizer;
