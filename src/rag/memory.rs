//! In-process vector index
//!
//! Holds every index in memory and answers queries with an exhaustive
//! cosine-similarity scan, which is plenty for a help center's worth of
//! articles.

use crate::rag::traits::{IndexEntry, ScoredRecord, VectorIndex};
use crate::rag::{RagError, RagResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
struct IndexState {
    dimension: usize,
    entries: Vec<IndexEntry>,
}

/// Vector index kept entirely in memory
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    indexes: RwLock<HashMap<String, IndexState>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> RagError {
        RagError::Index("index lock poisoned".to_string())
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn ensure_index(&self, name: &str, dimension: usize) -> RagResult<()> {
        let mut indexes = self.indexes.write().map_err(|_| Self::poisoned())?;

        match indexes.get(name) {
            Some(existing) if existing.dimension != dimension => Err(RagError::DimensionMismatch {
                expected: existing.dimension,
                actual: dimension,
            }),
            Some(_) => Ok(()),
            None => {
                tracing::info!("Creating index '{}' (dimension {})", name, dimension);
                indexes.insert(
                    name.to_string(),
                    IndexState {
                        dimension,
                        entries: Vec::new(),
                    },
                );
                Ok(())
            }
        }
    }

    async fn count(&self, name: &str) -> RagResult<usize> {
        let indexes = self.indexes.read().map_err(|_| Self::poisoned())?;
        indexes
            .get(name)
            .map(|index| index.entries.len())
            .ok_or_else(|| RagError::IndexNotFound(name.to_string()))
    }

    async fn upsert(&self, name: &str, entries: Vec<IndexEntry>) -> RagResult<()> {
        let mut indexes = self.indexes.write().map_err(|_| Self::poisoned())?;
        let index = indexes
            .get_mut(name)
            .ok_or_else(|| RagError::IndexNotFound(name.to_string()))?;

        if let Some(bad) = entries.iter().find(|e| e.vector.len() != index.dimension) {
            return Err(RagError::DimensionMismatch {
                expected: index.dimension,
                actual: bad.vector.len(),
            });
        }

        for entry in entries {
            match index.entries.iter_mut().find(|existing| existing.id == entry.id) {
                Some(existing) => *existing = entry,
                None => index.entries.push(entry),
            }
        }

        Ok(())
    }

    async fn query_by_similarity(
        &self,
        name: &str,
        vector: &[f32],
        k: usize,
    ) -> RagResult<Vec<ScoredRecord>> {
        let indexes = self.indexes.read().map_err(|_| Self::poisoned())?;
        let index = indexes
            .get(name)
            .ok_or_else(|| RagError::IndexNotFound(name.to_string()))?;

        if vector.len() != index.dimension {
            return Err(RagError::DimensionMismatch {
                expected: index.dimension,
                actual: vector.len(),
            });
        }

        let mut scored: Vec<ScoredRecord> = index
            .entries
            .iter()
            .map(|entry| ScoredRecord {
                score: cosine_similarity(vector, &entry.vector),
                record: entry.record.clone(),
            })
            .collect();

        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);

        Ok(scored)
    }
}

/// Cosine similarity; zero when either vector has no magnitude
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
