//! Markdown and JSON report generation.
//!
//! Reports are exported only for successful runs.

use crate::models::{CompanyRow, Report, ReportMetadata};
use crate::view::portfolios;
use anyhow::{Context, Result};
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# VC Portfolio AI Company Analysis\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_portfolios_section(&report.portfolios));
    output.push_str(&generate_companies_section(&report.recurring_ai_companies));
    output.push_str(&generate_footer());

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Endpoint:** {}\n", metadata.endpoint));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Portfolios Submitted:** {}\n",
        metadata.portfolios_submitted
    ));
    section.push_str(&format!(
        "- **Analysis Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

fn generate_portfolios_section(urls: &[String]) -> String {
    let mut section = String::new();

    section.push_str("## Portfolios\n\n");
    for url in urls {
        section.push_str(&format!("- <{}>\n", url));
    }
    section.push('\n');

    section
}

fn generate_companies_section(rows: &[CompanyRow]) -> String {
    let mut section = String::new();

    section.push_str("## Recurring AI Companies\n\n");

    if rows.is_empty() {
        section.push_str("No AI company appears in more than one submitted portfolio.\n\n");
        return section;
    }

    section.push_str("| Company | Portfolios |\n");
    section.push_str("|:---|:---:|\n");
    for row in rows {
        section.push_str(&format!(
            "| {} | Found in {} {} |\n",
            escape_cell(&row.company),
            row.count,
            portfolios(row.count)
        ));
    }
    section.push('\n');

    section
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn generate_footer() -> String {
    "---\n\n*Report generated by portfolio-scout*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered report content to `path`.
pub fn save_report(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
