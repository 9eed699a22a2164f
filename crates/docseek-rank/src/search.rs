//! The downstream `search` operation: extract, rank, return paths.

use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use docseek_core::traits::{Normalize, TextChunker, TextSource};
use docseek_core::{Error, FolderExtractor, Result, SearchRequest, SentenceChunker, Settings};
use docseek_embed::get_default_embedder;
use docseek_text::Normalizer;
use docseek_vector::{open_backend, SimilarityIndex};

use crate::ranker::Ranker;

pub struct DocumentSearch<S, N, C> where S: TextSource, N: Normalize, C: TextChunker {
    source: S,
    ranker: Ranker<N, C>,
}

impl<S, N, C> DocumentSearch<S, N, C> where S: TextSource, N: Normalize, C: TextChunker {
    pub fn new(source: S, ranker: Ranker<N, C>) -> Self { Self { source, ranker } }

    pub fn ranker(&self) -> &Ranker<N, C> { &self.ranker }

    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<PathBuf>> {
        let documents = self.source.extract(request.root_path())?;
        info!(root = %request.root_path().display(), documents = documents.len(), "extracted");
        self.ranker.rank_with_chunk_length(&documents, request.query(), request.top_k(), request.chunk_length()).await
    }
}

impl DocumentSearch<FolderExtractor, Normalizer, SentenceChunker> {
    /// Wire the default components from `settings`: folder extraction, the
    /// configured normalizer languages, the configured embedder and backend.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let normalizer = Normalizer::from_settings(&settings.normalizer)?;
        let embedder = get_default_embedder(&settings.embedding).map_err(Error::index_unavailable)?;
        let backend = open_backend(&settings.index, embedder).await?;
        let index = SimilarityIndex::new(backend, Duration::from_secs(settings.search.timeout_secs));
        let ranker = Ranker::new(normalizer, SentenceChunker::new(), index, settings.search.chunk_length)
            .with_workers(settings.search.workers);
        Ok(Self::new(FolderExtractor::new(), ranker))
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.ranker = self.ranker.with_progress(progress);
        self
    }
}

/// Rank the documents under `root_path` by relevance to `query`.
pub async fn search(settings: &Settings, root_path: &Path, query: &str, chunk_length: usize, top_k: usize) -> Result<Vec<PathBuf>> {
    let request = SearchRequest::new(root_path, query, chunk_length, top_k)?;
    DocumentSearch::from_settings(settings).await?.search(&request).await
}
