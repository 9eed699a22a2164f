//! Domain types shared by the chunker, the similarity index and the ranker.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// A source document as yielded by text extraction.
///
/// - `path`: stable identity, relative to the search root
/// - `text`: raw extracted text, immutable once extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self { path: path.into(), text: text.into() }
    }
}

/// A normalized, sentence-aligned slice of a document.
///
/// `document` borrows the owning document's path; `index` is the zero-based
/// position inside that document and doubles as the backend chunk id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub document: &'a Path,
    pub index: usize,
    pub text: String,
}

impl Chunk<'_> {
    /// Length in characters, not bytes.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// One row handed to a similarity backend on upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub id: String,
    pub doc_path: String,
    pub chunk_index: usize,
    pub content: String,
}

impl From<&Chunk<'_>> for ChunkRecord {
    fn from(chunk: &Chunk<'_>) -> Self {
        Self {
            id: chunk.index.to_string(),
            doc_path: chunk.document.to_string_lossy().to_string(),
            chunk_index: chunk.index,
            content: chunk.text.clone(),
        }
    }
}

/// Handle to a per-document collection held by the similarity backend.
///
/// Returned by indexing and passed explicitly to queries; never looked up
/// by ambient name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub name: String,
    pub doc_path: PathBuf,
    pub len: usize,
}

impl Collection {
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Derive a backend-safe collection name from a relative document path.
    ///
    /// Components are joined with `.`, characters outside `[A-Za-z0-9_.-]`
    /// become `_`, and a short digest of the full path keeps distinct paths
    /// apart after sanitizing.
    pub fn name_for(path: &Path) -> String {
        let joined = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(".");
        let sanitized: String = joined
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') { c } else { '_' })
            .collect();
        let digest = blake3::hash(path.to_string_lossy().as_bytes()).to_hex();
        format!("doc.{}.{}", sanitized, &digest.as_str()[..12])
    }
}

/// A nearest-neighbor hit reported by a similarity backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub content: String,
    /// Backend-defined dissimilarity; lower is more similar.
    pub distance: f32,
}

/// A document's single best-matching chunk for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub distance: f32,
    pub chunk: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_are_dotted_and_sanitized() {
        let name = Collection::name_for(Path::new("reports/2024/q1 summary.txt"));
        assert!(name.starts_with("doc.reports.2024.q1_summary.txt."), "{name}");
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')));
    }

    #[test]
    fn sanitized_collisions_keep_distinct_names() {
        let a = Collection::name_for(Path::new("кошка.txt"));
        let b = Collection::name_for(Path::new("собака.txt"));
        assert_ne!(a, b);
    }

    #[test]
    fn chunk_length_counts_characters() {
        let path = PathBuf::from("a.txt");
        let chunk = Chunk { document: &path, index: 0, text: "кошк спит".to_string() };
        assert_eq!(chunk.len(), 9);
        let record = ChunkRecord::from(&chunk);
        assert_eq!(record.id, "0");
        assert_eq!(record.doc_path, "a.txt");
    }
}
