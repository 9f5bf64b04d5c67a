//! Storage traits and error types
//!
//! This module defines the trait interface for corpus storage backends and
//! associated error types.

use crate::corpus::Corpus;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Corpus not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corpus field '{field}' has {actual} entries, expected {expected}")]
    Misaligned {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for corpus storage backends
///
/// The corpus store is the only persisted form of crawl output. Callers
/// check `exists` before deciding whether a crawl is needed.
pub trait CorpusStore {
    /// Returns true if a corpus has been saved
    fn exists(&self) -> bool;

    /// Persists a corpus, replacing any previous one
    ///
    /// A failed save must leave a previously saved corpus readable.
    fn save(&self, corpus: &Corpus) -> StorageResult<()>;

    /// Loads the saved corpus
    fn load(&self) -> StorageResult<Corpus>;
}
