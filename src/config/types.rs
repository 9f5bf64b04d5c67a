use crate::url::LinkMode;
use serde::Deserialize;

/// Main configuration structure for HelpHub
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub rag: RagConfig,
}

/// Help-center structure: where to start and how to find each tree level
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root URL of the help center (also the base for every resolved link)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Anchors on the root page that lead to categories
    #[serde(rename = "category-selector", default = "default_category_selector")]
    pub category_selector: String,

    /// Anchors on a category page that lead to sections
    #[serde(rename = "section-selector", default = "default_section_selector")]
    pub section_selector: String,

    /// Anchors on a section page that lead to articles
    #[serde(
        rename = "article-list-selector",
        default = "default_article_list_selector"
    )]
    pub article_list_selector: String,

    /// The element holding an article's text
    #[serde(
        rename = "article-body-selector",
        default = "default_article_body_selector"
    )]
    pub article_body_selector: String,

    #[serde(rename = "category-link-mode", default = "default_category_mode")]
    pub category_link_mode: LinkMode,

    #[serde(rename = "section-link-mode", default = "default_nested_mode")]
    pub section_link_mode: LinkMode,

    #[serde(rename = "article-link-mode", default = "default_nested_mode")]
    pub article_link_mode: LinkMode,
}

/// What the crawler does with an article page that has no body element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingBodyPolicy {
    /// Drop the article, record it in the crawl report and keep going
    #[default]
    Skip,
    /// Stop the crawl with `HelpHubError::MissingArticleBody`
    Abort,
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Per-request timeout (milliseconds)
    #[serde(rename = "request-timeout-ms", default = "default_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Number of in-flight requests per crawl phase; 1 is fully sequential
    #[serde(rename = "max-concurrent-fetches", default = "default_concurrency")]
    pub max_concurrent_fetches: usize,

    #[serde(rename = "missing-body", default)]
    pub missing_body: MissingBodyPolicy,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_timeout_ms(),
            max_concurrent_fetches: default_concurrency(),
            missing_body: MissingBodyPolicy::default(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the persisted JSON corpus
    #[serde(rename = "corpus-path", default = "default_corpus_path")]
    pub corpus_path: String,

    /// Optional path for the markdown crawl report
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            summary_path: None,
        }
    }
}

/// Retrieval-QA provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct RagConfig {
    #[serde(rename = "index-name", default = "default_index_name")]
    pub index_name: String,

    /// Embedding dimensionality the index is created with
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Number of records retrieved per question
    #[serde(rename = "top-k", default = "default_top_k")]
    pub top_k: usize,

    /// OpenAI-compatible API root
    #[serde(rename = "api-base-url", default = "default_api_base_url")]
    pub api_base_url: String,

    /// Environment variable holding the API key
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(rename = "embedding-model", default = "default_embedding_model")]
    pub embedding_model: String,

    #[serde(rename = "chat-model", default = "default_chat_model")]
    pub chat_model: String,

    #[serde(default)]
    pub temperature: f32,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            index_name: default_index_name(),
            dimension: default_dimension(),
            top_k: default_top_k(),
            api_base_url: default_api_base_url(),
            api_key_env: default_api_key_env(),
            embedding_model: default_embedding_model(),
            chat_model: default_chat_model(),
            temperature: 0.0,
        }
    }
}

fn default_category_selector() -> String {
    "a.blocks-item-link".to_string()
}

fn default_section_selector() -> String {
    "section.section h2 a".to_string()
}

fn default_article_list_selector() -> String {
    "a.article-list-link".to_string()
}

fn default_article_body_selector() -> String {
    "div.article-body".to_string()
}

fn default_category_mode() -> LinkMode {
    LinkMode::AbsoluteAppend
}

fn default_nested_mode() -> LinkMode {
    LinkMode::RootRelative
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_concurrency() -> usize {
    1
}

fn default_corpus_path() -> String {
    "./data/stack-help_data.json".to_string()
}

fn default_index_name() -> String {
    "stackragapp".to_string()
}

fn default_dimension() -> usize {
    768
}

fn default_top_k() -> usize {
    4
}

fn default_api_base_url() -> String {
    "https://api.together.xyz/v1".to_string()
}

fn default_api_key_env() -> String {
    "TOGETHER_API_KEY".to_string()
}

fn default_embedding_model() -> String {
    "togethercomputer/m2-bert-80M-8k-retrieval".to_string()
}

fn default_chat_model() -> String {
    "meta-llama/Meta-Llama-3-70B-Instruct-Turbo".to_string()
}
