use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::ProgressBar;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use docseek_core::traits::{Normalize, Rank, TextChunker};
use docseek_core::types::{Chunk, Document};
use docseek_core::{Error, Result};
use docseek_vector::SimilarityIndex;

/// One document's best internal match.
#[derive(Debug, Clone)]
struct Scored { order: usize, distance: f32, path: PathBuf }

pub struct Ranker<N, C> where N: Normalize, C: TextChunker {
    normalizer: N,
    chunker: C,
    index: SimilarityIndex,
    chunk_length: usize,
    workers: usize,
    progress: Option<ProgressBar>,
}

impl<N, C> Ranker<N, C> where N: Normalize, C: TextChunker {
    pub fn new(normalizer: N, chunker: C, index: SimilarityIndex, chunk_length: usize) -> Self {
        let workers = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4);
        Self { normalizer, chunker, index, chunk_length, workers, progress: None }
    }

    pub fn with_workers(mut self, workers: usize) -> Self { self.workers = workers.max(1); self }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self { self.progress = Some(progress); self }

    async fn score(&self, order: usize, doc: &Document, query: &str, chunk_length: usize) -> Result<Option<Scored>> {
        let chunks: Vec<Chunk> = self.chunker.chunk(&doc.text, chunk_length).iter().enumerate()
            .map(|(index, raw)| Chunk { document: &doc.path, index, text: self.normalizer.normalize(raw) })
            .collect();
        let outcome = match self.index.index(&doc.path, &chunks).await {
            Ok(collection) => self.index.best_match(&collection, query).await,
            Err(e) => Err(e),
        };
        if let Some(pb) = &self.progress { pb.inc(1); }
        match outcome {
            Ok(hit) => {
                debug!(path = %doc.path.display(), distance = hit.distance, chunks = chunks.len(), "scored");
                Ok(Some(Scored { order, distance: hit.distance, path: doc.path.clone() }))
            }
            Err(Error::EmptyCollection(path)) => { warn!(%path, "skipping document without indexable text"); Ok(None) }
            Err(e) => Err(e),
        }
    }

    /// Rank `documents` against `query`, chunking with an explicit bound.
    pub async fn rank_with_chunk_length(&self, documents: &[Document], query: &str, k: usize, chunk_length: usize) -> Result<Vec<PathBuf>> {
        if k == 0 { return Err(Error::InvalidConfig("k must be > 0".into())); }
        if chunk_length == 0 { return Err(Error::InvalidConfig("chunk_length must be > 0".into())); }
        let query = self.normalizer.normalize(query);
        info!(documents = documents.len(), k, workers = self.workers, query = %query, "ranking");
        if let Some(pb) = &self.progress { pb.set_length(documents.len() as u64); }

        let pending: Vec<_> = documents.iter().enumerate()
            .map(|(order, doc)| self.score(order, doc, &query, chunk_length))
            .collect();
        let scored: Vec<Option<Scored>> = stream::iter(pending)
            .buffer_unordered(self.workers)
            .try_collect()
            .await?;
        let mut scored: Vec<Scored> = scored.into_iter().flatten().collect();
        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.order.cmp(&b.order)));
        scored.truncate(k);

        if let Some(pb) = &self.progress { pb.finish_and_clear(); }
        info!(matched = scored.len(), "ranking done");
        Ok(scored.into_iter().map(|s| s.path).collect())
    }
}

#[async_trait]
impl<N, C> Rank for Ranker<N, C> where N: Normalize, C: TextChunker {
    async fn rank(&self, documents: &[Document], query: &str, k: usize) -> Result<Vec<PathBuf>> {
        self.rank_with_chunk_length(documents, query, k, self.chunk_length).await
    }
}
