//! The remote analysis service.
//!
//! The session only talks to an [`Analyzer`]; [`HttpAnalyzer`] is the
//! production implementation that POSTs to the analysis endpoint.

pub mod http;

pub use http::{HttpAnalyzer, HttpAnalyzerConfig};

use crate::error::AnalysisError;
use crate::models::ResultSet;
use async_trait::async_trait;

/// Something that can turn portfolio URLs into recurring-company counts.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Run one analysis over `urls`.
    async fn analyze(&self, urls: &[String]) -> Result<ResultSet, AnalysisError>;
}
