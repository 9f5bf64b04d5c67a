//! Crawl bookkeeping
//!
//! Every page the crawler touches is accounted for here, so a short corpus
//! can be explained after the fact: which pages failed to fetch, which
//! matched nothing, and which articles were dropped for lack of a body.

use crate::corpus::Corpus;
use crate::crawler::fetcher::{FetchFailure, Selection};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Tree level a page was fetched for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlLevel {
    /// The help-center root, listing categories
    Root,
    /// A category page, listing sections
    Category,
    /// A section page, listing articles
    Section,
    /// An article page, holding the body
    Article,
}

impl fmt::Display for CrawlLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Root => "root",
            Self::Category => "category",
            Self::Section => "section",
            Self::Article => "article",
        };
        write!(f, "{}", name)
    }
}

/// One page that contributed nothing to the corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageIssue {
    pub level: CrawlLevel,
    pub url: String,
    pub detail: String,
}

/// Summary of one crawl run
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub base_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Every GET issued, successful or not
    pub pages_requested: usize,

    /// Pages that could not be fetched
    pub failed_fetches: Vec<PageIssue>,

    /// Pages fetched but with no matching nodes
    pub empty_pages: Vec<PageIssue>,

    /// Articles dropped because no body could be extracted
    pub skipped_articles: Vec<PageIssue>,

    pub categories: usize,
    pub sections: usize,
    pub articles: usize,
}

impl CrawlReport {
    pub fn start(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            pages_requested: 0,
            failed_fetches: Vec::new(),
            empty_pages: Vec::new(),
            skipped_articles: Vec::new(),
            categories: 0,
            sections: 0,
            articles: 0,
        }
    }

    /// Accounts for one fetched page
    pub fn record(&mut self, level: CrawlLevel, url: &str, selection: &Selection) {
        self.pages_requested += 1;

        match selection {
            Selection::Matched(_) => {}
            Selection::Empty => {
                tracing::warn!("No {} matches on {}", level.child_name(), url);
                self.empty_pages.push(PageIssue {
                    level,
                    url: url.to_string(),
                    detail: format!("no {} found", level.child_name()),
                });
            }
            Selection::Failed(failure) => self.failed_fetches.push(PageIssue {
                level,
                url: failure.url().to_string(),
                detail: describe_failure(failure),
            }),
        }
    }

    /// Accounts for an article dropped for lack of a body
    pub fn skip_article(&mut self, url: &str, detail: impl Into<String>) {
        self.skipped_articles.push(PageIssue {
            level: CrawlLevel::Article,
            url: url.to_string(),
            detail: detail.into(),
        });
    }

    /// Stamps the finish time and the final corpus sizes
    pub fn finish(&mut self, corpus: &Corpus) {
        self.finished_at = Some(Utc::now());
        self.categories = corpus.category_titles.len();
        self.sections = corpus.sections.len();
        self.articles = corpus.articles.len();
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// True when every requested page produced data
    pub fn is_clean(&self) -> bool {
        self.failed_fetches.is_empty() && self.empty_pages.is_empty() && self.skipped_articles.is_empty()
    }
}

impl CrawlLevel {
    fn child_name(&self) -> &'static str {
        match self {
            Self::Root => "category links",
            Self::Category => "section links",
            Self::Section => "article links",
            Self::Article => "article body",
        }
    }
}

fn describe_failure(failure: &FetchFailure) -> String {
    match failure {
        FetchFailure::Timeout { .. } => "timeout".to_string(),
        FetchFailure::Connect { error, .. } => format!("connection: {}", error),
        FetchFailure::Status { status_code, .. } => format!("HTTP {}", status_code),
        FetchFailure::Other { error, .. } => error.clone(),
    }
}
