//! HTTP fetcher implementation
//!
//! This module handles every HTTP request the crawler makes:
//! - Building the HTTP client with the user agent and per-request timeout
//! - GET requests for help-center pages
//! - Failure classification (timeout, connection, status, other)
//! - Selecting nodes from the fetched document
//!
//! Failures never escape as errors. They come back as `Selection::Failed` so
//! the crawl can continue with a hole at that position while callers still
//! see why the hole is there.

use crate::config::{FetcherConfig, UserAgentConfig};
use crate::crawler::parser::{select_nodes, Node};
use reqwest::Client;
use scraper::Selector;
use std::fmt;
use std::time::Duration;

/// Why a page could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The request exceeded the configured timeout
    Timeout { url: String },

    /// DNS failure, refused or reset connection
    Connect { url: String, error: String },

    /// The server answered with a non-2xx status
    Status { url: String, status_code: u16 },

    /// Anything else (invalid URL, body decode error, ...)
    Other { url: String, error: String },
}

impl FetchFailure {
    /// The URL that failed
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Connect { url, .. }
            | Self::Status { url, .. }
            | Self::Other { url, .. } => url,
        }
    }

    fn from_reqwest(url: &str, error: &reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Connect {
                url,
                error: error.to_string(),
            }
        } else {
            Self::Other {
                url,
                error: error.to_string(),
            }
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { url } => write!(f, "request timeout for {}", url),
            Self::Connect { url, error } => write!(f, "connection failed for {}: {}", url, error),
            Self::Status { url, status_code } => write!(f, "HTTP {} for {}", status_code, url),
            Self::Other { url, error } => write!(f, "request failed for {}: {}", url, error),
        }
    }
}

/// Result of fetching a page and selecting nodes from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The page was fetched and at least one node matched
    Matched(Vec<Node>),

    /// The page was fetched but nothing matched
    Empty,

    /// The page could not be fetched
    Failed(FetchFailure),
}

impl Selection {
    /// Matched nodes; empty for both `Empty` and `Failed`
    pub fn into_nodes(self) -> Vec<Node> {
        match self {
            Self::Matched(nodes) => nodes,
            Self::Empty | Self::Failed(_) => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Number of matched nodes
    pub fn len(&self) -> usize {
        match self {
            Self::Matched(nodes) => nodes.len(),
            Self::Empty | Self::Failed(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use helphub::config::{FetcherConfig, UserAgentConfig};
/// use helphub::crawler::build_http_client;
///
/// let user_agent = UserAgentConfig {
///     crawler_name: "HelpHub".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&FetcherConfig::default(), &user_agent).unwrap();
/// ```
pub fn build_http_client(
    fetcher: &FetcherConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_millis(fetcher.request_timeout_ms))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body, classifying any failure
///
/// Non-2xx responses are failures; their bodies are not parsed.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FetchFailure> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchFailure::from_reqwest(url, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchFailure::Status {
            url: url.to_string(),
            status_code: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| FetchFailure::from_reqwest(url, &e))
}

/// Fetches pages and selects nodes from them
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(fetcher: &FetcherConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(fetcher, user_agent)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `url` and returns the nodes matching `selector`
    ///
    /// Fetch failures are logged here and returned as `Selection::Failed`.
    pub async fn select(&self, url: &str, selector: &Selector) -> Selection {
        tracing::debug!("Fetching {}", url);

        match fetch_page(&self.client, url).await {
            Ok(body) => {
                let nodes = select_nodes(&body, selector);
                if nodes.is_empty() {
                    Selection::Empty
                } else {
                    Selection::Matched(nodes)
                }
            }
            Err(failure) => {
                tracing::warn!("Fetch failed: {}", failure);
                Selection::Failed(failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&FetcherConfig::default(), &create_test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        assert_eq!(
            create_test_config().header_value(),
            "TestCrawler/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    #[test]
    fn test_selection_into_nodes() {
        let node = Node {
            href: Some("/hc/a".to_string()),
            text: "A".to_string(),
        };

        assert_eq!(Selection::Matched(vec![node.clone()]).into_nodes(), vec![node]);
        assert!(Selection::Empty.into_nodes().is_empty());

        let failed = Selection::Failed(FetchFailure::Timeout {
            url: "https://x.com/".to_string(),
        });
        assert!(failed.is_failed());
        assert!(failed.is_empty());
        assert!(failed.into_nodes().is_empty());
    }

    #[test]
    fn test_failure_display_names_url() {
        let failure = FetchFailure::Status {
            url: "https://x.com/hc/a".to_string(),
            status_code: 503,
        };
        assert_eq!(failure.url(), "https://x.com/hc/a");
        assert_eq!(failure.to_string(), "HTTP 503 for https://x.com/hc/a");
    }

    #[tokio::test]
    async fn test_invalid_url_is_a_failure_not_a_panic() {
        let fetcher = Fetcher::new(&FetcherConfig::default(), &create_test_config()).unwrap();
        let selector = Selector::parse("a").unwrap();

        let selection = fetcher.select("not a url", &selector).await;
        assert!(matches!(selection, Selection::Failed(FetchFailure::Other { .. })));
    }

    // Network behavior is covered with wiremock in the integration tests
}
