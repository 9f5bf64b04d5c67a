//! Output module for crawl reports and corpus statistics
//!
//! This module handles:
//! - Writing a markdown report after each crawl
//! - Summarizing a saved corpus on the console

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_report, generate_markdown_report};
pub use stats::{print_statistics, CorpusStatistics};
