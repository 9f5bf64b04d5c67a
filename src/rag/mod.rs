//! Retrieval-augmented question answering over cleaned records
//!
//! This module handles:
//! - The provider seams (embedding, vector index, chat completion)
//! - An in-process cosine index
//! - An OpenAI-compatible HTTP provider for the Together API
//! - Prompt composition and source extraction
//! - The `RetrievalQa` service, which never fails towards its caller

mod memory;
mod prompt;
mod qa;
mod together;
mod traits;

pub use memory::{cosine_similarity, InMemoryIndex};
pub use prompt::{build_prompt, format_document, split_sources};
pub use qa::{ask, Answer, RetrievalQa, FALLBACK_ANSWER};
pub use together::TogetherClient;
pub use traits::{ChatModel, Embedder, IndexEntry, ScoredRecord, VectorIndex};

use thiserror::Error;

/// Errors raised by the retrieval-QA collaborators
#[derive(Debug, Error)]
pub enum RagError {
    /// Missing API key or unusable settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failed or timed out
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response from a provider
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// Internal index failure
    #[error("Index error: {0}")]
    Index(String),
}

/// Result type alias for retrieval-QA operations
pub type RagResult<T> = std::result::Result<T, RagError>;
