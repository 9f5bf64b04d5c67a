//! Markdown crawl report generation
//!
//! This module renders a `CrawlReport` as a human-readable markdown file:
//! run information, tree sizes, and every page that left a hole.

use crate::crawler::{CrawlReport, PageIssue};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Issues listed per table before the rest are elided
const MAX_LISTED_ISSUES: usize = 50;

/// Writes the markdown report for a crawl
///
/// # Arguments
///
/// * `report` - The crawl report
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_report(report: &CrawlReport, output_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# HelpHub Crawl Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Site**: {}\n", report.base_url));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    if let Some(finished) = &report.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = report.duration_seconds() {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    md.push('\n');

    md.push_str("## Corpus\n\n");
    md.push_str("| Level | Count |\n");
    md.push_str("|-------|-------|\n");
    md.push_str(&format!("| Categories | {} |\n", report.categories));
    md.push_str(&format!("| Sections | {} |\n", report.sections));
    md.push_str(&format!("| Articles | {} |\n\n", report.articles));

    md.push_str("## Requests\n\n");
    md.push_str(&format!("- **Pages requested**: {}\n", report.pages_requested));
    md.push_str(&format!("- **Failed fetches**: {}\n", report.failed_fetches.len()));
    md.push_str(&format!("- **Empty pages**: {}\n", report.empty_pages.len()));
    md.push_str(&format!(
        "- **Skipped articles**: {}\n\n",
        report.skipped_articles.len()
    ));

    push_issue_table(&mut md, "Failed Fetches", &report.failed_fetches);
    push_issue_table(&mut md, "Empty Pages", &report.empty_pages);
    push_issue_table(&mut md, "Skipped Articles", &report.skipped_articles);

    md
}

fn push_issue_table(md: &mut String, heading: &str, issues: &[PageIssue]) {
    if issues.is_empty() {
        return;
    }

    md.push_str(&format!("## {}\n\n", heading));
    md.push_str("| Level | URL | Detail |\n");
    md.push_str("|-------|-----|--------|\n");
    for issue in issues.iter().take(MAX_LISTED_ISSUES) {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            issue.level,
            issue.url,
            issue.detail.replace('|', "\\|")
        ));
    }
    push_elided(md, issues.len());
}

fn push_elided(md: &mut String, total: usize) {
    if total > MAX_LISTED_ISSUES {
        md.push_str(&format!("\n... and {} more\n\n", total - MAX_LISTED_ISSUES));
    } else {
        md.push('\n');
    }
}
