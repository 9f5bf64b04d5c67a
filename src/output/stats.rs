//! Statistics over a saved corpus
//!
//! This module provides functionality for summarizing a corpus and
//! displaying the numbers on the console.

use crate::corpus::{clean_body, Corpus, EMPTY_SENTINEL};

/// Corpus statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusStatistics {
    pub categories: usize,
    pub sections: usize,
    pub articles: usize,

    /// Articles whose body cleans down to nothing
    pub empty_bodies: usize,

    /// Article URLs that appear more than once
    pub duplicate_urls: usize,

    /// Mean raw body length in characters
    pub average_body_chars: f64,
}

impl CorpusStatistics {
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let articles = corpus.articles.len();

        let empty_bodies = corpus
            .articles
            .iter()
            .filter(|article| clean_body(&article.body) == EMPTY_SENTINEL)
            .count();

        let duplicate_urls = corpus
            .articles
            .iter()
            .enumerate()
            .filter(|(i, article)| corpus.article_position(&article.url) != Some(*i))
            .count();

        let total_chars: usize = corpus
            .articles
            .iter()
            .map(|article| article.body.chars().count())
            .sum();
        let average_body_chars = if articles > 0 {
            total_chars as f64 / articles as f64
        } else {
            0.0
        };

        Self {
            categories: corpus.category_titles.len(),
            sections: corpus.sections.len(),
            articles,
            empty_bodies,
            duplicate_urls,
            average_body_chars,
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CorpusStatistics) {
    println!("=== Corpus Statistics ===\n");

    println!("Tree:");
    println!("  Categories: {}", stats.categories);
    println!("  Sections: {}", stats.sections);
    println!("  Articles: {}", stats.articles);
    println!();

    println!("Articles:");
    println!("  Average body length: {:.0} characters", stats.average_body_chars);
    println!("  Empty after cleaning: {}", stats.empty_bodies);
    println!("  Duplicate URLs: {}", stats.duplicate_urls);
}
