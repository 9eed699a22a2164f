use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::traits::TextSource;
use crate::types::Document;

/// Extensions read verbatim as UTF-8 text.
pub const PLAIN_TEXT_EXTENSIONS: &[&str] = &["txt", "csv", "json", "xml", "html", "md", "log", "py"];

/// Walks a folder tree and yields every plain-text file as a [`Document`]
/// keyed by its path relative to the root.
///
/// Binary formats (`.docx`, `.pdf`, ...) need a decoder and are skipped.
#[derive(Debug, Clone)]
pub struct FolderExtractor {
    extensions: Vec<String>,
}

impl Default for FolderExtractor {
    fn default() -> Self {
        Self { extensions: PLAIN_TEXT_EXTENSIONS.iter().map(|e| e.to_string()).collect() }
    }
}

impl FolderExtractor {
    pub fn new() -> Self { Self::default() }

    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { extensions: extensions.into_iter().map(|e| e.into().to_ascii_lowercase()).collect() }
    }

    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    /// Files under `root` in discovery order (sorted by name at every level).
    /// Entries the walk cannot visit are logged and left out.
    fn list_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(path = ?e.path(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() { continue; }
            if self.is_supported(entry.path()) {
                files.push(entry.path().to_path_buf());
            } else {
                debug!(path = %entry.path().display(), "skipping file without a text decoder");
            }
        }
        files
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        let bytes = fs::read(file_path)
            .map_err(|e| Error::Extraction { path: file_path.to_path_buf(), message: e.to_string() })?;
        match String::from_utf8(bytes) {
            Ok(content) => Ok(content),
            Err(e) => Ok(String::from_utf8_lossy(e.as_bytes()).to_string()),
        }
    }
}

impl TextSource for FolderExtractor {
    fn extract(&self, root: &Path) -> Result<Vec<Document>> {
        if !root.is_dir() {
            return Err(Error::Extraction { path: root.to_path_buf(), message: "not a directory".to_string() });
        }
        let files = self.list_files(root);
        let mut documents = Vec::with_capacity(files.len());
        for file_path in files {
            let text = match self.read_file_content(&file_path) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable file");
                    continue;
                }
            };
            let relative = file_path.strip_prefix(root).unwrap_or(&file_path).to_path_buf();
            debug!(path = %relative.display(), bytes = text.len(), "extracted");
            documents.push(Document::new(relative, text));
        }
        Ok(documents)
    }
}
