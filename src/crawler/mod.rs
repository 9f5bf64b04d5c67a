//! Crawler module for help-center traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with failure classification
//! - HTML node selection and text normalization
//! - The category → section → article traversal
//! - Crawl bookkeeping
//! - The "crawl only when no corpus exists" entry point

mod coordinator;
mod fetcher;
mod parser;
mod report;

pub use coordinator::{CrawlOutcome, TreeCrawler};
pub use fetcher::{build_http_client, fetch_page, FetchFailure, Fetcher, Selection};
pub use parser::{normalize_body, normalize_title, page_refs, parse_selector, select_nodes, Node};
pub use report::{CrawlLevel, CrawlReport, PageIssue};

use crate::config::Config;
use crate::corpus::Corpus;
use crate::storage::CorpusStore;
use crate::HelpHubError;

/// Runs a complete crawl operation
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl finished (possibly with holes, see the report)
/// * `Err(HelpHubError)` - Crawler setup failed or a missing body aborted the crawl
pub async fn crawl(config: &Config) -> Result<CrawlOutcome, HelpHubError> {
    TreeCrawler::new(config)?.crawl().await
}

/// Where the corpus returned by `ensure_corpus` came from
#[derive(Debug, Clone)]
pub enum CorpusSource {
    /// An existing corpus was loaded from the store
    Loaded(Corpus),
    /// A fresh crawl produced the corpus, which was then saved
    Crawled(CrawlOutcome),
}

impl CorpusSource {
    pub fn corpus(&self) -> &Corpus {
        match self {
            Self::Loaded(corpus) => corpus,
            Self::Crawled(outcome) => &outcome.corpus,
        }
    }

    pub fn into_corpus(self) -> Corpus {
        match self {
            Self::Loaded(corpus) => corpus,
            Self::Crawled(outcome) => outcome.corpus,
        }
    }
}

/// Makes sure a corpus exists, crawling only when needed
///
/// With `fresh` set the existing corpus is ignored and replaced. A store
/// write failure is fatal.
///
/// # Example
///
/// ```no_run
/// use helphub::config::load_config;
/// use helphub::crawler::{ensure_corpus, TreeCrawler};
/// use helphub::storage::JsonCorpusStore;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("helphub.toml"))?;
/// let store = JsonCorpusStore::new(&config.output.corpus_path);
/// let crawler = TreeCrawler::new(&config)?;
/// let corpus = ensure_corpus(&crawler, &store, false).await?.into_corpus();
/// println!("{} articles", corpus.articles.len());
/// # Ok(())
/// # }
/// ```
pub async fn ensure_corpus<S: CorpusStore>(
    crawler: &TreeCrawler,
    store: &S,
    fresh: bool,
) -> Result<CorpusSource, HelpHubError> {
    if !fresh && store.exists() {
        tracing::info!("Corpus found, no need to crawl");
        return Ok(CorpusSource::Loaded(store.load()?));
    }

    if fresh {
        tracing::info!("Fresh crawl requested, ignoring any existing corpus");
    } else {
        tracing::info!("Corpus not found, running crawler");
    }

    let outcome = crawler.crawl().await?;
    store.save(&outcome.corpus)?;

    Ok(CorpusSource::Crawled(outcome))
}
