//! Error types for routine aggregation and rendering

use std::fmt;
use thiserror::Error;

/// Result type alias for routine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving, aggregating or rendering routines
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed session grammar, unparseable time or bad short code
    #[error("Invalid descriptor: {0}")]
    Descriptor(String),

    /// Remote lookup failed or matched nothing
    #[error("Resolution failed: {0}")]
    Resolution(String),

    /// Render precondition failed
    #[error("Rendering failed: {0}")]
    Render(String),

    /// Render exceeded its time budget
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True when the failure is a render timeout the caller may retry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}

/// Outcome of a permissive parse that could not recognise its input.
///
/// Day tokens, color strings and theme names never hard-fail; the parser
/// hands back the raw input with a reason and the caller decides whether to
/// substitute a default and warn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    pub input: String,
    pub reason: &'static str,
}

impl Fallback {
    pub fn new(input: impl Into<String>, reason: &'static str) -> Self {
        Self { input: input.into(), reason }
    }
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.reason, self.input)
    }
}

/// A failure scoped to one input source. Sibling sources are unaffected.
#[derive(Debug, Error)]
#[error("Error processing routine for {source_name}: {error}")]
pub struct SourceError {
    pub source_name: String,
    /// Position of the source in the caller's input list
    pub position: usize,
    #[source]
    pub error: Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_error_names_the_source() {
        let err = SourceError {
            source_name: "Alice".into(),
            position: 0,
            error: Error::Resolution("No matching sections found".into()),
        };
        assert_eq!(
            err.to_string(),
            "Error processing routine for Alice: Resolution failed: No matching sections found"
        );
    }

    #[test]
    fn timeout_is_distinguishable() {
        assert!(Error::Timeout(50).is_timeout());
        assert!(!Error::Render("empty".into()).is_timeout());
    }
}
