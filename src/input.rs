//! Raw input normalization.
//!
//! Turns the verbatim multi-line text an operator typed or piped in into
//! the ordered list of portfolio URLs sent to the analysis service.

/// Split raw text into trimmed, non-empty lines.
///
/// Order is preserved and duplicates are passed through unchanged.
pub fn normalize(raw: &str) -> Vec<String> {
    raw.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
