use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The document produced no indexable chunks. Skipped by the ranker.
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// The similarity backend could not be reached, failed, or timed out.
    #[error("Index unavailable: {0}")]
    IndexUnavailable(String),

    /// A stemming/lemmatization resource is missing. Raised at startup only.
    #[error("Normalization failure: {0}")]
    NormalizationFailure(String),

    #[error("Failed to extract text from {}: {message}", path.display())]
    Extraction { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn index_unavailable(err: impl std::fmt::Display) -> Self {
        Error::IndexUnavailable(err.to_string())
    }

    /// Only an empty document is recoverable; everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::EmptyCollection(_))
    }

    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
