//! URL handling module for HelpHub
//!
//! Links on the help center are joined onto the configured base URL with one
//! of two rules, selected per tree level.

mod resolve;

pub use resolve::{resolve_link, LinkMode};
