//! HelpHub: help-center crawler and retrieval-QA toolkit
//!
//! This crate crawls a category → section → article help center, persists the
//! extracted articles as a JSON corpus, derives cleaned records from it, and
//! answers questions over those records through pluggable embedding, vector
//! index and chat-completion providers.

pub mod config;
pub mod corpus;
pub mod crawler;
pub mod output;
pub mod rag;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for HelpHub operations
#[derive(Debug, Error)]
pub enum HelpHubError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No article body found at {url}")]
    MissingArticleBody { url: String },

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Retrieval error: {0}")]
    Rag(#[from] rag::RagError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),
}

/// Result type alias for HelpHub operations
pub type Result<T> = std::result::Result<T, HelpHubError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use corpus::{build_records, Article, CleanedRecord, Corpus, PageRef};
pub use crawler::{CrawlOutcome, TreeCrawler};
pub use storage::{CorpusStore, JsonCorpusStore};
pub use url::{resolve_link, LinkMode};
