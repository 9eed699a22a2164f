use std::sync::Arc;

use docseek_core::config::{BackendKind, IndexSettings};
use docseek_core::traits::{Embedder, SimilarityBackend};
use docseek_core::{Error, Result};

pub mod lance;
pub mod memory;

pub use lance::LanceBackend;
pub use memory::MemoryBackend;

/// Run the CPU-bound embedder off the async runtime.
pub(crate) async fn embed_blocking(embedder: &Arc<dyn Embedder>, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
    let expected = texts.len();
    let embedder = Arc::clone(embedder);
    let vectors = tokio::task::spawn_blocking(move || embedder.embed_batch(&texts))
        .await
        .map_err(Error::index_unavailable)?
        .map_err(Error::index_unavailable)?;
    if vectors.len() != expected {
        return Err(Error::IndexUnavailable(format!("embedder returned {} vectors for {} texts", vectors.len(), expected)));
    }
    Ok(vectors)
}

/// Build the backend named by `[index] backend`.
pub async fn open_backend(settings: &IndexSettings, embedder: Arc<dyn Embedder>) -> Result<Arc<dyn SimilarityBackend>> {
    Ok(match settings.backend {
        BackendKind::Lance => Arc::new(LanceBackend::open(&settings.db_path(), embedder).await?),
        BackendKind::Memory => Arc::new(MemoryBackend::new(embedder)),
    })
}
