//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.portfolio-scout.toml` files.

use crate::cli::{Args, OutputFormat};
use crate::client::HttpAnalyzerConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".portfolio-scout.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analysis service settings.
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Analysis service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Full URL of the analyze endpoint.
    #[serde(default = "default_endpoint_url")]
    pub url: String,

    /// Request timeout in seconds. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,

    /// Honour proxy environment variables.
    #[serde(default = "default_true")]
    pub use_system_proxy: bool,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_endpoint_url(),
            timeout_seconds: None,
            use_system_proxy: true,
        }
    }
}

fn default_endpoint_url() -> String {
    "http://localhost:5000/analyze".to_string()
}

fn default_true() -> bool {
    true
}

/// Report export settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Format used when a report is written.
    #[serde(default)]
    pub format: OutputFormat,

    /// Write a report here after every successful run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.portfolio-scout.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence, but only when explicitly given.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref endpoint) = args.endpoint {
            self.endpoint.url = endpoint.clone();
        }
        if let Some(timeout) = args.timeout {
            self.endpoint.timeout_seconds = Some(timeout);
        }
        if args.no_proxy {
            self.endpoint.use_system_proxy = false;
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(ref output) = args.output {
            self.report.output = Some(output.clone());
        }
    }

    /// Settings for the HTTP analysis client.
    pub fn analyzer_config(&self) -> HttpAnalyzerConfig {
        HttpAnalyzerConfig {
            endpoint: self.endpoint.url.clone(),
            timeout_seconds: self.endpoint.timeout_seconds,
            use_system_proxy: self.endpoint.use_system_proxy,
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.endpoint.url, "http://localhost:5000/analyze");
        assert!(config.endpoint.timeout_seconds.is_none());
        assert!(config.endpoint.use_system_proxy);
        assert_eq!(config.report.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[endpoint]
url = "https://analyzer.example.com/analyze"
timeout_seconds = 600

[report]
format = "json"
output = "recurring.json"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.endpoint.url, "https://analyzer.example.com/analyze");
        assert_eq!(config.endpoint.timeout_seconds, Some(600));
        assert_eq!(config.report.format, OutputFormat::Json);
        assert_eq!(config.report.output, Some(PathBuf::from("recurring.json")));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[report]\nformat = \"markdown\"\n").unwrap();
        assert_eq!(config.endpoint.url, "http://localhost:5000/analyze");
        assert!(config.endpoint.use_system_proxy);
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        config.endpoint.timeout_seconds = Some(120);

        let args = Args::try_parse_from([
            "portfolio-scout",
            "--endpoint",
            "http://10.0.0.5:5000/analyze",
            "--format",
            "json",
            "--no-proxy",
            "https://vc1.com",
        ])
        .unwrap();
        config.merge_with_args(&args);

        let analyzer = config.analyzer_config();
        assert_eq!(analyzer.endpoint, "http://10.0.0.5:5000/analyze");
        assert_eq!(analyzer.timeout_seconds, Some(120));
        assert!(!analyzer.use_system_proxy);
        assert_eq!(config.report.format, OutputFormat::Json);
        assert!(config.report.output.is_none());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[endpoint]\nurl = \"http://scout:8080/analyze\"\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.endpoint.url, "http://scout:8080/analyze");

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[endpoint\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[endpoint]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.endpoint.url, "http://localhost:5000/analyze");
    }
}
