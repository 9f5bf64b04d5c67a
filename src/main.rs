//! HelpHub main entry point
//!
//! This is the command-line interface for the HelpHub crawler and
//! question-answering toolkit.

use anyhow::{Context, Result};
use clap::Parser;
use helphub::config::{load_config_with_hash, Config};
use helphub::corpus::build_records;
use helphub::crawler::{ensure_corpus, CorpusSource, TreeCrawler};
use helphub::output::{generate_markdown_report, print_statistics, CorpusStatistics};
use helphub::rag::ask;
use helphub::storage::{open_storage, CorpusStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// HelpHub: help-center crawler and question answering
///
/// HelpHub crawls a category → section → article help center into a JSON
/// corpus and answers questions over it with retrieved, cited articles.
#[derive(Parser, Debug)]
#[command(name = "helphub")]
#[command(version)]
#[command(about = "Help-center crawler and retrieval QA", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Re-crawl even if a corpus already exists
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    fresh: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with_all = ["stats", "ask"])]
    dry_run: bool,

    /// Show statistics for the saved corpus and exit
    #[arg(long, conflicts_with_all = ["dry_run", "ask"])]
    stats: bool,

    /// Answer a question from the corpus
    #[arg(long, value_name = "QUESTION", conflicts_with_all = ["dry_run", "stats"])]
    ask: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(question) = cli.ask.as_deref() {
        handle_ask(&config, question, cli.fresh).await?;
    } else {
        handle_crawl(&config, cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("helphub=info,warn"),
            1 => EnvFilter::new("helphub=debug,info"),
            2 => EnvFilter::new("helphub=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    println!("=== HelpHub Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!(
        "  Categories: {} ({})",
        config.site.category_selector, config.site.category_link_mode
    );
    println!(
        "  Sections: {} ({})",
        config.site.section_selector, config.site.section_link_mode
    );
    println!(
        "  Articles: {} ({})",
        config.site.article_list_selector, config.site.article_link_mode
    );
    println!("  Article body: {}", config.site.article_body_selector);

    println!("\nFetcher:");
    println!("  Request timeout: {}ms", config.fetcher.request_timeout_ms);
    println!(
        "  Max concurrent fetches: {}",
        config.fetcher.max_concurrent_fetches
    );
    println!("  Missing body: {:?}", config.fetcher.missing_body);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Corpus: {}", config.output.corpus_path);
    if let Some(summary) = &config.output.summary_path {
        println!("  Report: {}", summary);
    }

    println!("\nRetrieval:");
    println!(
        "  Index: {} (dimension {}, top {})",
        config.rag.index_name, config.rag.dimension, config.rag.top_k
    );
    println!("  API: {}", config.rag.api_base_url);
    println!("  Embedding model: {}", config.rag.embedding_model);
    println!("  Chat model: {}", config.rag.chat_model);

    println!("\n✓ Configuration is valid");
    let store = open_storage(Path::new(&config.output.corpus_path));
    if store.exists() {
        println!("✓ Corpus exists, a normal run would not crawl");
    } else {
        println!("✓ Would crawl {}", config.site.base_url);
    }
}

/// Handles the --stats mode: summarizes the saved corpus
fn handle_stats(config: &Config) -> Result<()> {
    println!("Corpus: {}\n", config.output.corpus_path);

    let store = open_storage(Path::new(&config.output.corpus_path));
    let corpus = store.load().context("Failed to load corpus")?;

    print_statistics(&CorpusStatistics::from_corpus(&corpus));

    Ok(())
}

/// Handles the default mode: crawl when needed, then summarize
async fn handle_crawl(config: &Config, fresh: bool) -> Result<()> {
    let source = load_or_crawl(config, fresh).await?;

    println!();
    print_statistics(&CorpusStatistics::from_corpus(source.corpus()));

    Ok(())
}

/// Handles the --ask mode: answers one question with sources
///
/// Provider failures are not errors here; they print the fallback answer.
async fn handle_ask(config: &Config, question: &str, fresh: bool) -> Result<()> {
    let corpus = load_or_crawl(config, fresh).await?.into_corpus();
    let records = build_records(&corpus);

    let answer = ask(&config.rag, &records, question).await;

    println!("{}", answer.answer);
    if !answer.sources.is_empty() {
        println!("\nSources:");
        for source in &answer.sources {
            println!("  - {}", source);
        }
    }

    Ok(())
}

/// Loads the corpus, crawling first if needed, and writes the crawl report
async fn load_or_crawl(config: &Config, fresh: bool) -> Result<CorpusSource> {
    let store = open_storage(Path::new(&config.output.corpus_path));
    let crawler = TreeCrawler::new(config)?;

    let source = match ensure_corpus(&crawler, &store, fresh).await {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if let CorpusSource::Crawled(outcome) = &source {
        tracing::info!(
            "Crawl completed: {} articles saved to {}",
            outcome.corpus.articles.len(),
            store.path().display()
        );

        if let Some(summary_path) = &config.output.summary_path {
            generate_markdown_report(&outcome.report, Path::new(summary_path))
                .with_context(|| format!("Failed to write crawl report to {}", summary_path))?;
            println!("✓ Crawl report written to: {}", summary_path);
        }
    }

    Ok(source)
}
