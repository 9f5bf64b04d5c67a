//! Corpus data model
//!
//! In memory the corpus keeps every field of a page or article together in
//! one record. On disk it is written as six parallel arrays (`CorpusFile`),
//! which is the format downstream tooling already reads.

use crate::storage::StorageError;
use serde::{Deserialize, Serialize};

/// One node of the help-center navigation tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub url: String,
    pub title: String,
}

impl PageRef {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// An article with its extracted body text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub body: String,
}

impl Article {
    /// Attaches a body to the article reference it was fetched from
    pub fn from_ref(page: PageRef, body: String) -> Self {
        Self {
            title: page.title,
            url: page.url,
            body,
        }
    }
}

/// Full output of one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    /// Category titles from the root page, in page order
    pub category_titles: Vec<String>,

    /// Sections of every category, flattened in category order
    pub sections: Vec<PageRef>,

    /// Articles of every section, flattened in section order
    pub articles: Vec<Article>,
}

impl Corpus {
    /// Returns the first article whose URL matches
    ///
    /// Duplicate article URLs are kept as separate entries; lookups by URL
    /// always resolve to the earliest position.
    pub fn article_by_url(&self, url: &str) -> Option<&Article> {
        self.articles.iter().find(|article| article.url == url)
    }

    /// Position of the first article with the given URL
    pub fn article_position(&self, url: &str) -> Option<usize> {
        self.articles.iter().position(|article| article.url == url)
    }

    pub fn is_empty(&self) -> bool {
        self.category_titles.is_empty() && self.sections.is_empty() && self.articles.is_empty()
    }
}

/// Persisted form of a corpus: six parallel arrays
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusFile {
    pub main_urls_titles: Vec<String>,
    pub section_tree_url: Vec<String>,
    pub section_title: Vec<String>,
    pub article_links: Vec<String>,
    pub article_link_title: Vec<String>,
    pub article_body: Vec<String>,
}

impl From<&Corpus> for CorpusFile {
    fn from(corpus: &Corpus) -> Self {
        Self {
            main_urls_titles: corpus.category_titles.clone(),
            section_tree_url: corpus.sections.iter().map(|s| s.url.clone()).collect(),
            section_title: corpus.sections.iter().map(|s| s.title.clone()).collect(),
            article_links: corpus.articles.iter().map(|a| a.url.clone()).collect(),
            article_link_title: corpus.articles.iter().map(|a| a.title.clone()).collect(),
            article_body: corpus.articles.iter().map(|a| a.body.clone()).collect(),
        }
    }
}

impl TryFrom<CorpusFile> for Corpus {
    type Error = StorageError;

    fn try_from(file: CorpusFile) -> Result<Self, Self::Error> {
        check_aligned("section_title", file.section_tree_url.len(), file.section_title.len())?;
        check_aligned(
            "article_link_title",
            file.article_links.len(),
            file.article_link_title.len(),
        )?;
        check_aligned("article_body", file.article_links.len(), file.article_body.len())?;

        let sections = file
            .section_tree_url
            .into_iter()
            .zip(file.section_title)
            .map(|(url, title)| PageRef { url, title })
            .collect();

        let articles = file
            .article_links
            .into_iter()
            .zip(file.article_link_title)
            .zip(file.article_body)
            .map(|((url, title), body)| Article { title, url, body })
            .collect();

        Ok(Corpus {
            category_titles: file.main_urls_titles,
            sections,
            articles,
        })
    }
}

fn check_aligned(field: &'static str, expected: usize, actual: usize) -> Result<(), StorageError> {
    if expected != actual {
        return Err(StorageError::Misaligned {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}
