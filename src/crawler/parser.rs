//! HTML parsing for the help-center tree
//!
//! This module handles turning fetched HTML into crawl data:
//! - Selecting nodes with a CSS selector into owned `Node` snapshots
//! - Turning anchor nodes into `PageRef`s with the level's link mode
//! - Normalizing titles and article bodies

use crate::corpus::PageRef;
use crate::url::{resolve_link, LinkMode};
use crate::HelpHubError;
use scraper::{Html, Selector};

/// An owned snapshot of a matched element
///
/// `scraper::Html` is not `Send`, so documents are parsed and dropped inside
/// one synchronous call and only these snapshots cross `.await` points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// The element's `href` attribute, if it has one
    pub href: Option<String>,

    /// All descendant text, concatenated
    pub text: String,
}

/// Parses a CSS selector, naming it in the error
pub fn parse_selector(selector: &str) -> Result<Selector, HelpHubError> {
    Selector::parse(selector).map_err(|e| HelpHubError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Parses `html` and returns every node matching `selector`, in document order
///
/// # Example
///
/// ```
/// use helphub::crawler::{parse_selector, select_nodes};
///
/// let html = r#"<a class="x" href="/hc/a">Alpha</a><a class="x">Beta</a>"#;
/// let nodes = select_nodes(html, &parse_selector("a.x").unwrap());
/// assert_eq!(nodes.len(), 2);
/// assert_eq!(nodes[0].href.as_deref(), Some("/hc/a"));
/// assert_eq!(nodes[1].text, "Beta");
/// ```
pub fn select_nodes(html: &str, selector: &Selector) -> Vec<Node> {
    let document = Html::parse_document(html);

    document
        .select(selector)
        .map(|element| Node {
            href: element.value().attr("href").map(str::to_string),
            text: element.text().collect::<String>(),
        })
        .collect()
}

/// Removes embedded newlines from a link title
pub fn normalize_title(text: &str) -> String {
    text.replace('\n', "")
}

/// Newlines become spaces and non-breaking spaces are dropped
pub fn normalize_body(text: &str) -> String {
    text.replace('\n', " ").replace('\u{a0}', "")
}

/// Turns anchor nodes into page references joined onto `base`
///
/// Anchors without an `href` are skipped; the rest keep their page order.
pub fn page_refs(nodes: Vec<Node>, base: &str, mode: LinkMode, page_url: &str) -> Vec<PageRef> {
    let mut refs = Vec::with_capacity(nodes.len());

    for node in nodes {
        match node.href {
            Some(href) => refs.push(PageRef {
                url: resolve_link(base, &href, mode),
                title: normalize_title(&node.text),
            }),
            None => {
                tracing::warn!(
                    "Skipping anchor without href on {}: {:?}",
                    page_url,
                    node.text.trim()
                );
            }
        }
    }

    refs
}
