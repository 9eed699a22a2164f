//! Similarity index adapter.
//!
//! Wraps a [`SimilarityBackend`] with the per-document collection contract:
//! positional chunk ids `0..len`, idempotent re-indexing, single nearest hit
//! per query, and a hard deadline on every backend call.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use docseek_core::traits::SimilarityBackend;
use docseek_core::types::{Chunk, ChunkRecord, Collection, QueryResult};
use docseek_core::{Error, Result};

#[derive(Clone)]
pub struct SimilarityIndex {
    backend: Arc<dyn SimilarityBackend>,
    timeout: Duration,
}

impl SimilarityIndex {
    pub fn new(backend: Arc<dyn SimilarityBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T>(&self, what: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(res) => res,
            Err(_) => Err(Error::IndexUnavailable(format!("{what} timed out after {:?}", self.timeout))),
        }
    }

    /// Upsert `chunks` into the collection owned by `doc_path`.
    ///
    /// Fails with `EmptyCollection` when no chunk carries any text.
    pub async fn index(&self, doc_path: &Path, chunks: &[Chunk<'_>]) -> Result<Collection> {
        if chunks.iter().all(|c| c.text.trim().is_empty()) {
            return Err(Error::EmptyCollection(doc_path.display().to_string()));
        }
        let name = Collection::name_for(doc_path);
        let records: Vec<ChunkRecord> = chunks.iter().map(ChunkRecord::from).collect();
        self.bounded("upsert", self.backend.upsert(&name, &records)).await?;
        debug!(collection = %name, chunks = records.len(), "indexed");
        Ok(Collection { name, doc_path: doc_path.to_path_buf(), len: records.len() })
    }

    /// The collection's single nearest chunk to an already-normalized `query`.
    pub async fn best_match(&self, collection: &Collection, query: &str) -> Result<QueryResult> {
        if collection.is_empty() {
            return Err(Error::EmptyCollection(collection.doc_path.display().to_string()));
        }
        let hits = self.bounded("query", self.backend.nearest(&collection.name, query, 1)).await?;
        let best = hits
            .into_iter()
            .next()
            .ok_or_else(|| Error::EmptyCollection(collection.doc_path.display().to_string()))?;
        Ok(QueryResult { distance: best.distance, chunk: best.content })
    }
}
