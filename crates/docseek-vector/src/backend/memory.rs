//! In-memory brute-force backend. Nothing persists past the process.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use docseek_core::traits::{Embedder, SimilarityBackend};
use docseek_core::types::{ChunkRecord, Neighbor};
use docseek_core::{Error, Result};

use super::embed_blocking;

#[derive(Debug, Clone)]
struct StoredChunk {
    chunk_index: usize,
    content: String,
    vector: Vec<f32>,
}

pub struct MemoryBackend {
    embedder: Arc<dyn Embedder>,
    collections: Arc<RwLock<HashMap<String, HashMap<String, StoredChunk>>>>,
}

impl MemoryBackend {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder, collections: Arc::new(RwLock::new(HashMap::new())) }
    }

    /// Number of rows currently held for `collection`.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections.read().await.get(collection).map(|c| c.len()).unwrap_or(0)
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }
        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl SimilarityBackend for MemoryBackend {
    async fn upsert(&self, collection: &str, records: &[ChunkRecord]) -> Result<()> {
        let texts: Vec<String> = records.iter().map(|r| r.content.clone()).collect();
        let vectors = embed_blocking(&self.embedder, texts).await?;
        let mut store = self.collections.write().await;
        let rows = store.entry(collection.to_string()).or_default();
        for (record, vector) in records.iter().zip(vectors) {
            rows.insert(record.id.clone(), StoredChunk { chunk_index: record.chunk_index, content: record.content.clone(), vector });
        }
        rows.retain(|_, row| row.chunk_index < records.len());
        debug!(collection, rows = rows.len(), "memory upsert");
        Ok(())
    }

    async fn nearest(&self, collection: &str, query: &str, n: usize) -> Result<Vec<Neighbor>> {
        let q = embed_blocking(&self.embedder, vec![query.to_string()]).await?.into_iter().next()
            .ok_or_else(|| Error::IndexUnavailable("embedder returned no vector".into()))?;
        let store = self.collections.read().await;
        let rows = store
            .get(collection)
            .ok_or_else(|| Error::IndexUnavailable(format!("no such collection: {collection}")))?;

        let mut scored: Vec<(f32, &StoredChunk)> = rows
            .values()
            .map(|row| (1.0 - Self::cosine_similarity(&q, &row.vector), row))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.chunk_index.cmp(&b.1.chunk_index)));

        Ok(scored
            .into_iter()
            .take(n)
            .map(|(distance, row)| Neighbor { content: row.content.clone(), distance })
            .collect())
    }
}
