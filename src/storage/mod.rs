//! Storage module for persisting the crawl corpus
//!
//! This module handles reading and writing the corpus file:
//! - Existence checks that decide whether a crawl is needed
//! - Atomic saves (temp file + rename) so a crash keeps the old corpus
//! - Loads that re-check the parallel-array alignment

mod json;
mod traits;

pub use json::JsonCorpusStore;
pub use traits::{CorpusStore, StorageError, StorageResult};

use std::path::Path;

/// Opens the JSON corpus store at the given path
///
/// # Example
///
/// ```no_run
/// use helphub::storage::{open_storage, CorpusStore};
/// use std::path::Path;
///
/// let store = open_storage(Path::new("./data/stack-help_data.json"));
/// if store.exists() {
///     let corpus = store.load().unwrap();
///     println!("{} articles", corpus.articles.len());
/// }
/// ```
pub fn open_storage(path: &Path) -> JsonCorpusStore {
    JsonCorpusStore::new(path)
}
