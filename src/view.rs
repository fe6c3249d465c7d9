//! Terminal rendering of the session state.
//!
//! One row per company, the error message verbatim, and a spinner while a
//! run is in flight.

use crate::models::{AnalysisState, ResultSet};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Whether the analyze action may be triggered.
pub fn analyze_enabled(state: &AnalysisState, urls: &[String]) -> bool {
    !state.is_running() && !urls.is_empty()
}

/// Label shown on the analyze action for the given state.
pub fn action_label(state: &AnalysisState) -> &'static str {
    if state.is_running() {
        "Analyzing..."
    } else {
        "Analyze Portfolios"
    }
}

/// Render a result set as aligned rows.
pub fn render_results(results: &ResultSet) -> String {
    if results.is_empty() {
        return "No AI companies recur across the submitted portfolios.\n".to_string();
    }

    let rows = results.rows();
    let width = rows
        .iter()
        .map(|row| row.company.chars().count())
        .max()
        .unwrap_or(0);

    let mut output = String::from("Recurring AI Companies\n\n");
    for row in rows {
        output.push_str(&format!(
            "  {:<width$}  Found in {} {}\n",
            row.company,
            row.count,
            portfolios(row.count),
            width = width
        ));
    }
    output
}

/// Render the failure message exactly as stored.
pub fn render_error(message: &str) -> String {
    format!("Error: {}", message)
}

/// Render whatever the state calls for. `Idle` and `Running` produce nothing.
pub fn render_state(state: &AnalysisState) -> Option<String> {
    match state {
        AnalysisState::Succeeded(results) => Some(render_results(results)),
        AnalysisState::Failed(message) => Some(render_error(message)),
        AnalysisState::Idle | AnalysisState::Running => None,
    }
}

pub(crate) fn portfolios(count: u64) -> &'static str {
    if count == 1 {
        "portfolio"
    } else {
        "portfolios"
    }
}

/// Spinner shown while a run is in flight.
pub fn spinner(state: &AnalysisState, url_count: usize) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!(
        "{} {} {}",
        action_label(state),
        url_count,
        portfolios(url_count as u64)
    ));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn results() -> ResultSet {
        let mut companies = HashMap::new();
        companies.insert("Acme".to_string(), 3);
        companies.insert("Globex Corporation".to_string(), 2);
        ResultSet::new(companies).unwrap()
    }

    #[test]
    fn test_analyze_enabled() {
        let urls = vec!["https://vc1.com".to_string()];

        assert!(analyze_enabled(&AnalysisState::Idle, &urls));
        assert!(analyze_enabled(&AnalysisState::Failed("x".into()), &urls));
        assert!(analyze_enabled(&AnalysisState::Succeeded(results()), &urls));
        assert!(!analyze_enabled(&AnalysisState::Running, &urls));
        assert!(!analyze_enabled(&AnalysisState::Idle, &[]));
    }

    #[test]
    fn test_action_label() {
        assert_eq!(action_label(&AnalysisState::Running), "Analyzing...");
        assert_eq!(action_label(&AnalysisState::Idle), "Analyze Portfolios");
    }

    #[test]
    fn test_render_results_one_row_per_company() {
        let output = render_results(&results());
        let rows: Vec<_> = output.lines().filter(|l| l.contains("Found in")).collect();

        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("Acme"));
        assert!(rows[0].ends_with("Found in 3 portfolios"));
        assert!(rows[1].contains("Globex Corporation"));
        assert!(rows[1].ends_with("Found in 2 portfolios"));
    }

    #[test]
    fn test_render_empty_results() {
        let output = render_results(&ResultSet::default());
        assert!(output.contains("No AI companies"));
    }

    #[test]
    fn test_render_error_verbatim() {
        let message = "Analysis failed: service responded with HTTP 502 Bad Gateway";
        let state = AnalysisState::Failed(message.to_string());
        assert_eq!(render_state(&state), Some(format!("Error: {}", message)));
    }

    #[test]
    fn test_render_nothing_while_idle_or_running() {
        assert!(render_state(&AnalysisState::Idle).is_none());
        assert!(render_state(&AnalysisState::Running).is_none());
    }
}
