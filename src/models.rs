//! Data models for portfolio analysis.
//!
//! This module contains the result set returned by the analysis service,
//! the session state machine value, and the request wire type.

use crate::error::AnalysisError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Response field carrying the company -> count mapping.
pub const RECURRING_FIELD: &str = "recurring_ai_companies";

/// Body of the analysis request: `{"urls": [...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub urls: &'a [String],
}

/// Recurring AI companies and the number of portfolios each appears in.
///
/// Immutable once built. Every count is at least 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    companies: HashMap<String, u64>,
}

/// One rendered row of a result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRow {
    pub company: String,
    pub count: u64,
}

impl ResultSet {
    /// Build a result set, rejecting zero counts.
    pub fn new(companies: HashMap<String, u64>) -> Result<Self, AnalysisError> {
        if let Some((name, _)) = companies.iter().find(|(_, count)| **count == 0) {
            return Err(AnalysisError::Malformed(format!(
                "company `{}` has a count of 0",
                name
            )));
        }
        Ok(Self { companies })
    }

    /// Extract the result set from a decoded response body.
    pub fn from_response(body: &Value) -> Result<Self, AnalysisError> {
        let field = body
            .get(RECURRING_FIELD)
            .ok_or_else(|| AnalysisError::Malformed(format!("missing `{}`", RECURRING_FIELD)))?;

        let object = field.as_object().ok_or_else(|| {
            AnalysisError::Malformed(format!("`{}` is not an object", RECURRING_FIELD))
        })?;

        let mut companies = HashMap::with_capacity(object.len());
        for (name, count) in object {
            let count = count.as_u64().ok_or_else(|| {
                AnalysisError::Malformed(format!(
                    "count for `{}` is not a positive integer: {}",
                    name, count
                ))
            })?;
            companies.insert(name.clone(), count);
        }

        Self::new(companies)
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    #[allow(dead_code)] // Lookup for embedding front ends
    pub fn get(&self, company: &str) -> Option<u64> {
        self.companies.get(company).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.companies.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Rows for display: most frequent first, ties broken by name.
    pub fn rows(&self) -> Vec<CompanyRow> {
        let mut rows: Vec<CompanyRow> = self
            .iter()
            .map(|(company, count)| CompanyRow {
                company: company.to_string(),
                count,
            })
            .collect();

        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.company.cmp(&b.company)));
        rows
    }
}

/// Lifecycle of an analysis session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnalysisState {
    /// Nothing has been submitted yet.
    #[default]
    Idle,
    /// A request is in flight.
    Running,
    /// The last run produced a result set.
    Succeeded(ResultSet),
    /// The last run failed; holds the message shown to the operator.
    Failed(String),
}

impl AnalysisState {
    pub fn is_running(&self) -> bool {
        matches!(self, AnalysisState::Running)
    }

    /// True for `Succeeded` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisState::Succeeded(_) | AnalysisState::Failed(_))
    }

    pub fn result_set(&self) -> Option<&ResultSet> {
        match self {
            AnalysisState::Succeeded(results) => Some(results),
            _ => None,
        }
    }

    #[allow(dead_code)] // Lookup for embedding front ends
    pub fn error_message(&self) -> Option<&str> {
        match self {
            AnalysisState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for AnalysisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisState::Idle => write!(f, "idle"),
            AnalysisState::Running => write!(f, "running"),
            AnalysisState::Succeeded(results) => {
                write!(f, "succeeded ({} companies)", results.len())
            }
            AnalysisState::Failed(_) => write!(f, "failed"),
        }
    }
}

/// Metadata about an exported report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Analysis endpoint that produced the results.
    pub endpoint: String,
    /// When the run resolved.
    pub analysis_date: DateTime<Utc>,
    /// Number of portfolio URLs submitted (duplicates included).
    pub portfolios_submitted: usize,
    /// Wall-clock duration of the run in seconds.
    pub duration_seconds: f64,
}

/// An exported analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    /// Submitted portfolio URLs, in input order.
    pub portfolios: Vec<String>,
    /// One row per recurring company, most frequent first.
    pub recurring_ai_companies: Vec<CompanyRow>,
}

impl Report {
    pub fn new(metadata: ReportMetadata, portfolios: Vec<String>, results: &ResultSet) -> Self {
        Self {
            metadata,
            portfolios,
            recurring_ai_companies: results.rows(),
        }
    }
}
