//! docseek-vector
//!
//! Per-document similarity collections over a pluggable backend (LanceDB on
//! disk, or an in-memory map for tests and one-shot runs).

pub mod backend;
pub mod index;
pub mod schema;

pub use backend::{open_backend, LanceBackend, MemoryBackend};
pub use index::SimilarityIndex;
