//! Error types for Folio core.

use std::path::{Path, PathBuf};

/// Errors that can occur while syncing, caching, or reading portfolio data.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Remote collection failure (fetch, append, upload or subscribe rejected).
    #[error("Remote error: {message}")]
    Remote {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Input rejected before any network call
    #[error("Validation error: {message}")]
    Validation {
        /// Field or aspect that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// I/O error without path context
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error on a known path
    #[error("I/O error at {}: {source}", path.display())]
    IoPath {
        /// Path being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Mirror store capacity exceeded
    #[error("Mirror quota exceeded writing '{key}': {needed} bytes needed, capacity {capacity}")]
    QuotaExceeded {
        /// Key being written
        key: String,
        /// Total bytes the store would hold after the write
        needed: usize,
        /// Configured capacity in bytes
        capacity: usize,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// Document not found in a collection
    #[error("Not found: {collection}/{id}")]
    NotFound {
        /// Collection searched
        collection: String,
        /// Identifier that was not found
        id: String,
    },
}

/// Convenience `Result` type alias for Folio operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether this error is retryable.
    ///
    /// Folio never retries on its own; this tells a caller (or a user looking
    /// at an error message) whether trying again later could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Remote { .. } => true,
            Error::Io(_) => true,
            Error::IoPath { .. } => true,
            Error::Validation { .. } => false,
            Error::Serialization(_) => false,
            Error::QuotaExceeded { .. } => false,
            Error::Config { .. } => false,
            Error::NotFound { .. } => false,
        }
    }

    /// Creates a new remote error with a message.
    pub fn remote<S: Into<String>>(message: S) -> Self {
        Error::Remote {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new remote error with a message and source error.
    pub fn remote_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Remote {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path it occurred on.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::IoPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a not-found error.
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Error::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::remote("connection reset");
        assert_eq!(err.to_string(), "Remote error: connection reset");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(Error::remote("test").is_retryable());
        assert!(!Error::validation("test").is_retryable());
        assert!(!Error::config("test").is_retryable());
        assert!(!Error::not_found("projects", "a").is_retryable());
    }

    #[test]
    fn test_validation_error_with_field() {
        let err = Error::validation_field("userName", "must not be empty");
        let Error::Validation { field, message } = err else {
            unreachable!("Expected Validation error variant");
        };
        assert_eq!(field, Some("userName".to_string()));
        assert_eq!(message, "must not be empty");
    }

    #[test]
    fn test_quota_exceeded_display() {
        let err = Error::QuotaExceeded {
            key: "projects".to_string(),
            needed: 6_000_000,
            capacity: 5_000_000,
        };
        assert_eq!(
            err.to_string(),
            "Mirror quota exceeded writing 'projects': 6000000 bytes needed, capacity 5000000"
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_error_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }

    #[test]
    fn test_remote_error_with_source() {
        let io_error = std::io::Error::other("network failure");
        let err = Error::remote_with_source("fetch projects failed", io_error);
        assert!(err.to_string().contains("fetch projects failed"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_io_with_path_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::io_with_path(io_error, "/tmp/mirror.json");
        assert!(err.to_string().contains("/tmp/mirror.json"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_serde_error_not_retryable() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let err: Error = serde_err.into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found("projects", "abc");
        assert_eq!(err.to_string(), "Not found: projects/abc");
    }
}
