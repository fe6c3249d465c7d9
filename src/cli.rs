//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and assembling the raw URL input.

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::PathBuf;

/// portfolio-scout - find AI companies that recur across VC portfolios
///
/// Submit venture-capital portfolio page URLs, one per line, and list the
/// AI companies the analysis service finds in more than one of them.
///
/// Examples:
///   portfolio-scout https://vc1.com/portfolio https://vc2.com/portfolio
///   portfolio-scout --urls-file portfolios.txt --format json -o report.json
///   cat portfolios.txt | portfolio-scout --endpoint http://analyzer:5000/analyze
///   portfolio-scout --urls-file portfolios.txt --dry-run
///   portfolio-scout --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Portfolio URLs to analyze
    ///
    /// Each argument may itself contain several newline-separated URLs.
    /// When neither URLs nor --urls-file are given, URLs are read from stdin.
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// File with one portfolio URL per line
    #[arg(short = 'f', long, value_name = "FILE")]
    pub urls_file: Option<PathBuf>,

    /// Analysis service endpoint
    ///
    /// Defaults to the config file value, or http://localhost:5000/analyze.
    #[arg(short, long, value_name = "URL", env = "PORTFOLIO_SCOUT_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    ///
    /// By default no timeout is applied and the request waits for the
    /// service however long it takes.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Ignore HTTP_PROXY/HTTPS_PROXY environment variables
    #[arg(long)]
    pub no_proxy: bool,

    /// Write a report of the results to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .portfolio-scout.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Normalize the input and list the URLs without calling the service
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .portfolio-scout.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the exported report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if let Some(ref endpoint) = self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err("Endpoint must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref path) = self.urls_file {
            if !path.is_file() {
                return Err(format!("URL file does not exist: {}", path.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Whether the raw input has to come from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.urls.is_empty() && self.urls_file.is_none()
    }

    /// Collect the verbatim multi-line input from arguments, file or stdin.
    pub fn read_raw_input(&self) -> Result<String> {
        let file_content = match self.urls_file {
            Some(ref path) => Some(
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read URL file: {}", path.display()))?,
            ),
            None => None,
        };

        if self.reads_stdin() {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read URLs from stdin")?;
            return Ok(raw);
        }

        Ok(assemble_raw_input(&self.urls, file_content.as_deref()))
    }
}

/// Join positional arguments and file content into one raw text block.
fn assemble_raw_input(urls: &[String], file_content: Option<&str>) -> String {
    let mut parts: Vec<&str> = urls.iter().map(String::as_str).collect();
    if let Some(content) = file_content {
        parts.push(content);
    }
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::normalize;

    fn make_args() -> Args {
        Args {
            urls: vec!["https://vc1.com/portfolio".to_string()],
            urls_file: None,
            endpoint: None,
            timeout: None,
            no_proxy: false,
            output: None,
            format: None,
            config: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_positional_and_flags() {
        let args = Args::try_parse_from([
            "portfolio-scout",
            "https://vc1.com",
            "https://vc2.com",
            "--format",
            "json",
            "--timeout",
            "30",
        ])
        .unwrap();

        assert_eq!(args.urls, vec!["https://vc1.com", "https://vc2.com"]);
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.timeout, Some(30));
    }

    #[test]
    fn test_validation_invalid_endpoint() {
        let mut args = make_args();
        args.endpoint = Some("localhost:5000/analyze".to_string());
        assert!(args.validate().is_err());

        args.endpoint = Some("https://analyzer.internal/analyze".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_urls_file() {
        let mut args = make_args();
        args.urls_file = Some(PathBuf::from("/definitely/not/here.txt"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_read_raw_input_from_args_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        std::fs::write(&path, "https://vc2.com\n\n  https://vc3.com  \n").unwrap();

        let mut args = make_args();
        args.urls_file = Some(path);
        assert!(!args.reads_stdin());

        let raw = args.read_raw_input().unwrap();
        assert_eq!(
            normalize(&raw),
            vec![
                "https://vc1.com/portfolio",
                "https://vc2.com",
                "https://vc3.com"
            ]
        );
    }

    #[test]
    fn test_assemble_raw_input() {
        let urls = vec!["a\nb".to_string(), "c".to_string()];
        assert_eq!(assemble_raw_input(&urls, None), "a\nb\nc");
        assert_eq!(assemble_raw_input(&[], Some("x\ny")), "x\ny");
    }
}
