//! Error types for the ttbb analysis

use thiserror::Error;

/// Analysis error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error (malformed configuration or input record)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error (broken numerical precondition)
    #[error("Computation error: {0}")]
    Computation(String),

    /// Non-finite momentum or weight in an input object
    #[error("Non-finite input: {0}")]
    NonFinite(String),

    /// Histogram booking, filling or merging error
    #[error("Histogram error: {0}")]
    Histogram(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category() {
        let err = Error::NonFinite("jet 2 has px = NaN".into());
        assert_eq!(err.to_string(), "Non-finite input: jet 2 has px = NaN");
    }

    #[test]
    fn json_errors_convert() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}
