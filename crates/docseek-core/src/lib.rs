#![deny(dead_code)]
#![deny(unused_variables)]

//! docseek-core
//!
//! Domain types, the error taxonomy, capability traits, configuration, the
//! sentence chunker and folder text extraction shared by every other crate.

pub mod chunker;
pub mod config;
pub mod error;
pub mod extract;
pub mod traits;
pub mod types;

pub use chunker::SentenceChunker;
pub use config::{Config, SearchRequest, Settings};
pub use error::{Error, Result};
pub use extract::FolderExtractor;
pub use types::{Chunk, ChunkRecord, Collection, Document, Neighbor, QueryResult};
