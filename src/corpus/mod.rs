//! Corpus types and the cleaned-record builder
//!
//! - `model`: page references, articles, the in-memory corpus and its
//!   six-array file form
//! - `builder`: text cleaning and `CleanedRecord` derivation

mod builder;
mod model;

pub use builder::{build_records, clean_body, clean_text, CleanedRecord, EMPTY_SENTINEL};
pub use model::{Article, Corpus, CorpusFile, PageRef};
