//! JSON file storage implementation
//!
//! This module provides a file-backed implementation of the CorpusStore trait.

use crate::corpus::{Corpus, CorpusFile};
use crate::storage::traits::{CorpusStore, StorageError, StorageResult};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Corpus stored as one pretty-printed UTF-8 JSON object
#[derive(Debug, Clone)]
pub struct JsonCorpusStore {
    path: PathBuf,
}

impl JsonCorpusStore {
    /// Creates a store backed by the file at `path`
    ///
    /// Nothing is touched on disk until `save` is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the corpus file lives in (the current directory for bare names)
    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl CorpusStore for JsonCorpusStore {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn save(&self, corpus: &Corpus) -> StorageResult<()> {
        let dir = self.parent_dir();
        std::fs::create_dir_all(dir)?;

        let file = CorpusFile::from(corpus);
        let mut buffer = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
        file.serialize(&mut serializer)?;

        // Write next to the target so the final rename stays on one filesystem
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&buffer)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StorageError::Io(e.error))?;

        tracing::info!(
            "Saved corpus to {} ({} sections, {} articles)",
            self.path.display(),
            corpus.sections.len(),
            corpus.articles.len()
        );

        Ok(())
    }

    fn load(&self) -> StorageResult<Corpus> {
        if !self.exists() {
            return Err(StorageError::NotFound(self.path.display().to_string()));
        }

        let content = std::fs::read_to_string(&self.path)?;
        let file: CorpusFile = serde_json::from_str(&content)?;
        let corpus = Corpus::try_from(file)?;

        tracing::debug!(
            "Loaded corpus from {} ({} articles)",
            self.path.display(),
            corpus.articles.len()
        );

        Ok(corpus)
    }
}
