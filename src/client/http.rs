//! HTTP client for the analysis endpoint.

use super::Analyzer;
use crate::error::AnalysisError;
use crate::models::{AnalyzeRequest, ResultSet};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Connection settings for [`HttpAnalyzer`].
#[derive(Debug, Clone)]
pub struct HttpAnalyzerConfig {
    /// Full URL of the analyze endpoint.
    pub endpoint: String,
    /// Per-request timeout. `None` waits as long as the service takes.
    pub timeout_seconds: Option<u64>,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub use_system_proxy: bool,
}

impl Default for HttpAnalyzerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000/analyze".to_string(),
            timeout_seconds: None,
            use_system_proxy: true,
        }
    }
}

/// Posts `{"urls": [...]}` to the analysis service.
pub struct HttpAnalyzer {
    config: HttpAnalyzerConfig,
    http_client: reqwest::Client,
}

impl HttpAnalyzer {
    pub fn new(config: HttpAnalyzerConfig) -> Result<Self> {
        info!("Using analysis endpoint {}", config.endpoint);

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http_client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> AnalysisError {
        let message = if e.is_timeout() {
            format!(
                "request timed out after {}s",
                self.config.timeout_seconds.unwrap_or_default()
            )
        } else if e.is_connect() {
            format!(
                "cannot connect to analysis service at {}",
                self.config.endpoint
            )
        } else {
            format!("request failed: {}", e)
        };
        AnalysisError::Transport(message)
    }
}

#[async_trait]
impl Analyzer for HttpAnalyzer {
    async fn analyze(&self, urls: &[String]) -> Result<ResultSet, AnalysisError> {
        debug!("POST {} with {} urls", self.config.endpoint, urls.len());

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .json(&AnalyzeRequest { urls })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(rejected(status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        parse_body(&body)
    }
}

fn rejected(status: StatusCode) -> AnalysisError {
    AnalysisError::Rejected {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("").to_string(),
    }
}

/// Decode a 2xx response body into a result set.
fn parse_body(body: &[u8]) -> Result<ResultSet, AnalysisError> {
    let json: Value = serde_json::from_slice(body)
        .map_err(|e| AnalysisError::Malformed(format!("body is not valid JSON: {}", e)))?;
    ResultSet::from_response(&json)
}
