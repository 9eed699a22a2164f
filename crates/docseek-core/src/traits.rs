use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::{ChunkRecord, Document, Neighbor};

/// Reduces surface text to its canonical comparable form.
///
/// Must be applied identically to indexed chunks and to queries.
pub trait Normalize: Send + Sync {
    fn normalize(&self, text: &str) -> String;
}

/// Splits a document's text into ordered, bounded chunks.
pub trait TextChunker: Send + Sync {
    fn chunk(&self, text: &str, max_len: usize) -> Vec<String>;
}

pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// External vector-similarity collaborator: embedding plus nearest-neighbor
/// search over named collections.
#[async_trait]
pub trait SimilarityBackend: Send + Sync {
    /// Insert or replace `records` in `collection`, keyed by `ChunkRecord::id`.
    /// Rows whose index is beyond `records.len()` are dropped.
    async fn upsert(&self, collection: &str, records: &[ChunkRecord]) -> Result<()>;

    /// Return up to `n` nearest chunks to `query`, closest first.
    async fn nearest(&self, collection: &str, query: &str, n: usize) -> Result<Vec<Neighbor>>;
}

/// Upstream text extraction: `relative path -> raw text` for a folder tree.
pub trait TextSource: Send + Sync {
    fn extract(&self, root: &Path) -> Result<Vec<Document>>;
}

#[async_trait]
pub trait Rank: Send + Sync {
    async fn rank(&self, documents: &[Document], query: &str, k: usize) -> Result<Vec<PathBuf>>;
}
