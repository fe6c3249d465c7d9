//! Failure taxonomy for an analysis run.

use thiserror::Error;

/// Why a run ended in the failed state.
///
/// The `Display` text is what the operator sees; the session stores it
/// verbatim as the error message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The request never completed (connect, timeout, interrupted body).
    #[error("Analysis failed: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("Analysis failed: service responded with HTTP {status} {reason}")]
    Rejected { status: u16, reason: String },

    /// A 2xx answer without a usable `recurring_ai_companies` mapping.
    #[error("Analysis failed: malformed response ({0})")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_descriptive() {
        let err = AnalysisError::Rejected {
            status: 500,
            reason: "Internal Server Error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Analysis failed: service responded with HTTP 500 Internal Server Error"
        );

        let err = AnalysisError::Malformed("missing `recurring_ai_companies`".to_string());
        assert!(err.to_string().contains("recurring_ai_companies"));

        let err = AnalysisError::Transport("connection refused".to_string());
        assert!(err.to_string().starts_with("Analysis failed"));
    }
}
