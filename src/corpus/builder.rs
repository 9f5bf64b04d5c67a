//! Corpus builder: turns articles into cleaned records for indexing
//!
//! Cleaning order matters and is fixed: slashes, punctuation, digits,
//! whitespace runs, then lowercase.

use crate::corpus::model::{Article, Corpus};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Stand-in for a body that cleans down to nothing
pub const EMPTY_SENTINEL: &str = "Empty";

/// An article after text normalization, ready for embedding
///
/// Always derived from a `Corpus`; never written back to the corpus store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub title: String,
    pub page_content: String,
    pub urls: String,
}

impl CleanedRecord {
    pub fn from_article(article: &Article) -> Self {
        Self {
            title: clean_text(&article.title),
            page_content: clean_body(&article.body),
            urls: article.url.clone(),
        }
    }
}

/// Builds one cleaned record per article, in corpus order
pub fn build_records(corpus: &Corpus) -> Vec<CleanedRecord> {
    let records: Vec<CleanedRecord> = corpus.articles.iter().map(CleanedRecord::from_article).collect();

    tracing::debug!(
        "Built {} cleaned records ({} empty bodies)",
        records.len(),
        records
            .iter()
            .filter(|r| r.page_content == EMPTY_SENTINEL)
            .count()
    );

    records
}

/// Decimal digits in any script (Unicode `Nd`)
fn decimal_digits() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"\d+").expect("digit pattern is valid"))
}

/// Applies the shared cleaning pipeline to a title or body
pub fn clean_text(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|&c| c != '/')
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    let stripped = decimal_digits().replace_all(&stripped, "");

    collapse_whitespace_runs(&stripped).to_lowercase()
}

/// Cleans an article body, substituting the sentinel for empty results
pub fn clean_body(text: &str) -> String {
    let cleaned = clean_text(text).replace("  ", " ");
    if cleaned.is_empty() {
        EMPTY_SENTINEL.to_string()
    } else {
        cleaned
    }
}

/// Replaces every run of two or more whitespace characters with one space
///
/// A lone whitespace character is left as it is, tabs included.
fn collapse_whitespace_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = String::new();

    for c in text.chars() {
        if c.is_whitespace() {
            run.push(c);
            continue;
        }
        flush_run(&mut out, &mut run);
        out.push(c);
    }
    flush_run(&mut out, &mut run);

    out
}

fn flush_run(out: &mut String, run: &mut String) {
    match run.chars().count() {
        0 => {}
        1 => out.push_str(run),
        _ => out.push(' '),
    }
    run.clear();
}
