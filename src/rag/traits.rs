//! Collaborator interfaces for retrieval-QA
//!
//! Embedding, vector storage and chat completion are hosted services; the
//! QA layer only talks to them through these traits.

use crate::corpus::CleanedRecord;
use crate::rag::RagResult;
use async_trait::async_trait;

/// Turns text into a fixed-size vector
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> RagResult<Vec<f32>>;
}

/// Produces a completion for a fully rendered prompt
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> RagResult<String>;
}

/// A record and its embedding, ready to upsert
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// Stable identifier; upserting an existing id replaces it
    pub id: String,
    pub vector: Vec<f32>,
    pub record: CleanedRecord,
}

/// A query match with its similarity score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub score: f32,
    pub record: CleanedRecord,
}

/// Named vector indexes with cosine similarity search
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Creates the index if it does not exist yet
    ///
    /// An existing index with a different dimension is an error.
    async fn ensure_index(&self, name: &str, dimension: usize) -> RagResult<()>;

    /// Number of vectors stored in the index
    async fn count(&self, name: &str) -> RagResult<usize>;

    async fn upsert(&self, name: &str, entries: Vec<IndexEntry>) -> RagResult<()>;

    /// The `k` most similar records, best first
    async fn query_by_similarity(
        &self,
        name: &str,
        vector: &[f32],
        k: usize,
    ) -> RagResult<Vec<ScoredRecord>>;
}
