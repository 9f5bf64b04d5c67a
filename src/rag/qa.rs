//! Retrieval-QA service
//!
//! Embeds the question, pulls the closest records from the vector index,
//! and asks the chat model to answer from them with cited links.

use crate::config::RagConfig;
use crate::corpus::CleanedRecord;
use crate::rag::memory::InMemoryIndex;
use crate::rag::prompt::{build_prompt, split_sources};
use crate::rag::together::TogetherClient;
use crate::rag::traits::{ChatModel, Embedder, IndexEntry, VectorIndex};
use crate::rag::RagResult;
use serde::Serialize;

/// Answer returned whenever a collaborator fails
pub const FALLBACK_ANSWER: &str = "I don't know.";

/// An answer with the help-center links it was drawn from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<String>,
}

impl Answer {
    pub fn fallback() -> Self {
        Self {
            answer: FALLBACK_ANSWER.to_string(),
            sources: Vec::new(),
        }
    }
}

/// Question answering over an indexed set of cleaned records
pub struct RetrievalQa<E, V, C> {
    embedder: E,
    index: V,
    chat: C,
    index_name: String,
    dimension: usize,
    top_k: usize,
}

impl<E, V, C> RetrievalQa<E, V, C>
where
    E: Embedder,
    V: VectorIndex,
    C: ChatModel,
{
    pub fn new(config: &RagConfig, embedder: E, index: V, chat: C) -> Self {
        Self {
            embedder,
            index,
            chat,
            index_name: config.index_name.clone(),
            dimension: config.dimension,
            top_k: config.top_k,
        }
    }

    pub fn index(&self) -> &V {
        &self.index
    }

    /// Makes sure the index exists and holds the records
    ///
    /// An index that already has vectors is reused as-is. Returns the number
    /// of records embedded by this call.
    pub async fn prepare(&self, records: &[CleanedRecord]) -> RagResult<usize> {
        self.index.ensure_index(&self.index_name, self.dimension).await?;

        let existing = self.index.count(&self.index_name).await?;
        if existing > 0 {
            tracing::info!(
                "Index '{}' already holds {} vectors, reusing it",
                self.index_name,
                existing
            );
            return Ok(0);
        }

        tracing::info!("Embedding {} records into '{}'", records.len(), self.index_name);

        let mut entries = Vec::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            let vector = self.embedder.embed(&record.page_content).await?;
            entries.push(IndexEntry {
                id: position.to_string(),
                vector,
                record: record.clone(),
            });

            if (position + 1) % 10 == 0 {
                tracing::debug!("Embedded {}/{} records", position + 1, records.len());
            }
        }

        let embedded = entries.len();
        self.index.upsert(&self.index_name, entries).await?;

        Ok(embedded)
    }

    /// Prepares the index, then answers
    ///
    /// A failed `prepare` is logged and the question is still put to
    /// `answer`, which then falls back.
    pub async fn prepare_and_answer(&self, records: &[CleanedRecord], question: &str) -> Answer {
        if let Err(e) = self.prepare(records).await {
            tracing::error!("Could not prepare index '{}': {}", self.index_name, e);
        }
        self.answer(question).await
    }

    /// Answers a question, falling back to "I don't know." on any failure
    pub async fn answer(&self, question: &str) -> Answer {
        match self.try_answer(question).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("Could not answer question: {}", e);
                Answer::fallback()
            }
        }
    }

    async fn try_answer(&self, question: &str) -> RagResult<Answer> {
        let vector = self.embedder.embed(question).await?;
        let matches = self
            .index
            .query_by_similarity(&self.index_name, &vector, self.top_k)
            .await?;

        tracing::debug!("Retrieved {} records for question", matches.len());

        let records: Vec<CleanedRecord> = matches.into_iter().map(|m| m.record).collect();
        let prompt = build_prompt(question, &records);
        let response = self.chat.complete(&prompt).await?;

        let (answer, sources) = split_sources(&response);
        let answer = if answer.is_empty() {
            FALLBACK_ANSWER.to_string()
        } else {
            answer
        };

        Ok(Answer { answer, sources })
    }
}

/// Answers one question over `records` with the configured provider
///
/// Never fails: a missing API key or any provider error gives the
/// fallback answer.
pub async fn ask(config: &RagConfig, records: &[CleanedRecord], question: &str) -> Answer {
    let client = match TogetherClient::from_config(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Could not create provider client: {}", e);
            return Answer::fallback();
        }
    };

    let qa = RetrievalQa::new(config, client.clone(), InMemoryIndex::new(), client);
    qa.prepare_and_answer(records, question).await
}
