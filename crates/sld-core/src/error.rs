//! Unified error type for the SLD crates
//!
//! Domain problems in a diagram (dangling references, islands, collisions)
//! are never errors: they are reported as [`ValidationIssue`]s. [`SldError`]
//! covers contract violations and I/O at the edges, such as an invalid grid
//! size or an unreadable snapshot file.
//!
//! [`ValidationIssue`]: crate::diagnostics::ValidationIssue

use thiserror::Error;

/// Unified error type for all SLD operations.
#[derive(Error, Debug)]
pub enum SldError {
    /// I/O errors (snapshot or config file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration errors (invalid grid size, bad config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation gate failures surfaced as errors by callers
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using SldError.
pub type SldResult<T> = Result<T, SldError>;

impl From<String> for SldError {
    fn from(s: String) -> Self {
        SldError::Other(s)
    }
}

impl From<&str> for SldError {
    fn from(s: &str) -> Self {
        SldError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for SldError {
    fn from(err: serde_json::Error) -> Self {
        SldError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for SldError {
    fn from(err: toml::de::Error) -> Self {
        SldError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SldError {
    fn from(err: toml::ser::Error) -> Self {
        SldError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SldError::Config("grid size must be positive".into());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("grid size"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SldError = io_err.into();
        assert!(matches!(err, SldError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err: SldError = json_err.into();
        assert!(matches!(err, SldError::Parse(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> SldResult<()> {
            Err(SldError::Validation("test".into()))
        }

        fn outer() -> SldResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
