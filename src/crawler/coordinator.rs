//! Crawler coordinator - the three-level help-center traversal
//!
//! The crawl runs in fixed phases with no backtracking:
//! 1. Root page → category links
//! 2. Each category page → section links (grouped per category, then flattened)
//! 3. Each section page → article links (grouped per section, then flattened)
//! 4. Each article page → article body
//!
//! Within a phase, fetches go through an order-preserving buffer, so the
//! output order is the same for any concurrency setting. Every intermediate
//! sequence is local to one `crawl()` call.

use crate::config::{Config, MissingBodyPolicy, SiteConfig};
use crate::corpus::{Article, Corpus, PageRef};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{normalize_body, page_refs, parse_selector};
use crate::crawler::report::{CrawlLevel, CrawlReport};
use crate::url::LinkMode;
use crate::HelpHubError;
use futures::stream::{self, StreamExt};
use scraper::Selector;

/// Compiled selectors for each tree level
#[derive(Debug, Clone)]
struct LevelSelectors {
    category: Selector,
    section: Selector,
    article_list: Selector,
    article_body: Selector,
}

impl LevelSelectors {
    fn compile(site: &SiteConfig) -> Result<Self, HelpHubError> {
        Ok(Self {
            category: parse_selector(&site.category_selector)?,
            section: parse_selector(&site.section_selector)?,
            article_list: parse_selector(&site.article_list_selector)?,
            article_body: parse_selector(&site.article_body_selector)?,
        })
    }
}

/// Corpus plus the bookkeeping of the crawl that produced it
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub corpus: Corpus,
    pub report: CrawlReport,
}

/// Walks a help center from its root down to article bodies
pub struct TreeCrawler {
    site: SiteConfig,
    fetcher: Fetcher,
    selectors: LevelSelectors,
    concurrency: usize,
    missing_body: MissingBodyPolicy,
}

impl TreeCrawler {
    /// Creates a crawler with its own HTTP client
    ///
    /// # Returns
    ///
    /// * `Ok(TreeCrawler)` - Ready to crawl
    /// * `Err(HelpHubError)` - A selector did not compile or the client could not be built
    pub fn new(config: &Config) -> Result<Self, HelpHubError> {
        let fetcher = Fetcher::new(&config.fetcher, &config.user_agent)?;
        Self::with_fetcher(config, fetcher)
    }

    /// Creates a crawler around an existing fetcher
    pub fn with_fetcher(config: &Config, fetcher: Fetcher) -> Result<Self, HelpHubError> {
        Ok(Self {
            site: config.site.clone(),
            fetcher,
            selectors: LevelSelectors::compile(&config.site)?,
            concurrency: config.fetcher.max_concurrent_fetches.max(1),
            missing_body: config.fetcher.missing_body,
        })
    }

    /// Runs a full crawl
    ///
    /// Pages that fail to fetch or match nothing leave empty holes and the
    /// crawl carries on. The only error is a missing article body under
    /// `MissingBodyPolicy::Abort`.
    pub async fn crawl(&self) -> Result<CrawlOutcome, HelpHubError> {
        let mut report = CrawlReport::start(&self.site.base_url);
        tracing::info!(
            "Starting crawl of {} ({} concurrent fetches)",
            self.site.base_url,
            self.concurrency
        );

        let categories = self.crawl_categories(&mut report).await;
        tracing::info!("Categories phase: {} categories", categories.len());

        let sections_by_category = self
            .expand_level(
                &categories,
                &self.selectors.section,
                self.site.section_link_mode,
                CrawlLevel::Category,
                &mut report,
            )
            .await;
        let sections: Vec<PageRef> = sections_by_category.into_iter().flatten().collect();
        tracing::info!("Sections phase: {} sections", sections.len());

        let articles_by_section = self
            .expand_level(
                &sections,
                &self.selectors.article_list,
                self.site.article_link_mode,
                CrawlLevel::Section,
                &mut report,
            )
            .await;
        let article_refs: Vec<PageRef> = articles_by_section.into_iter().flatten().collect();
        tracing::info!("Articles phase: {} article links", article_refs.len());

        let articles = self.fetch_bodies(article_refs, &mut report).await?;

        let corpus = Corpus {
            category_titles: categories.into_iter().map(|category| category.title).collect(),
            sections,
            articles,
        };
        report.finish(&corpus);

        tracing::info!(
            "Crawl completed: {} categories, {} sections, {} articles ({} pages requested, {} failed, {} empty, {} articles skipped)",
            report.categories,
            report.sections,
            report.articles,
            report.pages_requested,
            report.failed_fetches.len(),
            report.empty_pages.len(),
            report.skipped_articles.len()
        );

        Ok(CrawlOutcome { corpus, report })
    }

    /// Phase 1: category links from the root page
    async fn crawl_categories(&self, report: &mut CrawlReport) -> Vec<PageRef> {
        let base = self.site.base_url.as_str();
        let selection = self.fetcher.select(base, &self.selectors.category).await;
        report.record(CrawlLevel::Root, base, &selection);

        page_refs(selection.into_nodes(), base, self.site.category_link_mode, base)
    }

    /// Fetches every parent page and returns its child links, one group per parent
    ///
    /// Group `i` always belongs to `parents[i]`; a failed or empty page gives
    /// an empty group.
    async fn expand_level(
        &self,
        parents: &[PageRef],
        selector: &Selector,
        mode: LinkMode,
        level: CrawlLevel,
        report: &mut CrawlReport,
    ) -> Vec<Vec<PageRef>> {
        let fetcher = &self.fetcher;
        let mut pages = stream::iter(parents)
            .map(move |parent| async move {
                let selection = fetcher.select(&parent.url, selector).await;
                (parent, selection)
            })
            .buffered(self.concurrency);

        let mut children = Vec::with_capacity(parents.len());
        while let Some((parent, selection)) = pages.next().await {
            report.record(level, &parent.url, &selection);
            children.push(page_refs(
                selection.into_nodes(),
                &self.site.base_url,
                mode,
                &parent.url,
            ));
        }

        children
    }

    /// Phase 4: one body per article link
    ///
    /// Each body is paired with the reference it was fetched for, so titles
    /// stay attached by position even when URLs repeat.
    async fn fetch_bodies(
        &self,
        refs: Vec<PageRef>,
        report: &mut CrawlReport,
    ) -> Result<Vec<Article>, HelpHubError> {
        let total = refs.len();
        let fetcher = &self.fetcher;
        let selector = &self.selectors.article_body;
        let mut pages = stream::iter(refs)
            .map(move |page| async move {
                let selection = fetcher.select(&page.url, selector).await;
                (page, selection)
            })
            .buffered(self.concurrency);

        let mut articles = Vec::with_capacity(total);
        let mut processed = 0;
        while let Some((page, selection)) = pages.next().await {
            report.record(CrawlLevel::Article, &page.url, &selection);
            processed += 1;
            let fetch_failed = selection.is_failed();

            // The first body node is the article; extras are ignored
            match selection.into_nodes().into_iter().next() {
                Some(node) => {
                    let body = normalize_body(&node.text);
                    articles.push(Article::from_ref(page, body));
                }
                None => match self.missing_body {
                    MissingBodyPolicy::Skip => {
                        tracing::warn!("Skipping article without body: {}", page.url);
                        let detail = if fetch_failed {
                            "no article body (fetch failed)"
                        } else {
                            "no article body"
                        };
                        report.skip_article(&page.url, detail);
                    }
                    MissingBodyPolicy::Abort => {
                        tracing::error!("Aborting crawl, no article body at {}", page.url);
                        return Err(HelpHubError::MissingArticleBody { url: page.url });
                    }
                },
            }

            if processed % 10 == 0 {
                tracing::info!("Progress: {}/{} articles fetched", processed, total);
            }
        }

        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    fn create_test_config(extra_site: &str) -> Config {
        parse_config(&format!(
            r#"
[site]
base-url = "https://help.example.com/"
{}

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"
"#,
            extra_site
        ))
        .unwrap()
    }

    #[test]
    fn test_crawler_creation() {
        let crawler = TreeCrawler::new(&create_test_config("")).unwrap();
        assert_eq!(crawler.concurrency, 1);
        assert_eq!(crawler.missing_body, MissingBodyPolicy::Skip);
    }

    #[test]
    fn test_invalid_selector_rejected_at_construction() {
        let mut config = create_test_config("");
        config.site.article_body_selector = "div[".to_string();

        let result = TreeCrawler::new(&config);
        assert!(matches!(
            result,
            Err(HelpHubError::InvalidSelector { ref selector, .. }) if selector == "div["
        ));
    }

    #[tokio::test]
    async fn test_unreachable_root_gives_empty_corpus() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let mut config = create_test_config("");
        config.site.base_url = "http://127.0.0.1:9/".to_string();
        config.fetcher.request_timeout_ms = 500;

        let crawler = TreeCrawler::new(&config).unwrap();
        let outcome = crawler.crawl().await.unwrap();

        assert!(outcome.corpus.is_empty());
        assert_eq!(outcome.report.pages_requested, 1);
        assert_eq!(outcome.report.failed_fetches.len(), 1);
        assert_eq!(outcome.report.failed_fetches[0].level, CrawlLevel::Root);
    }
}
