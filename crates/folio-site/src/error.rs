//! Comment submission errors.

use thiserror::Error;

/// Message shown for any failure that reached the network.
pub const NETWORK_FAILURE_MESSAGE: &str = "Failed to post comment. Please try again.";

/// Result type for comment submission.
pub type SubmitResult<T> = std::result::Result<T, SubmitError>;

/// Why a comment was not posted.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    /// Another submission from the same widget has not finished.
    #[error("A comment is already being posted")]
    InFlight,

    /// Author or text is empty after trimming.
    #[error("Validation error: {field} {message}")]
    Validation {
        /// Offending form field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// The attached profile image is over the size limit.
    #[error("Image too large: {size} bytes exceeds limit of {limit} bytes")]
    ImageTooLarge {
        /// Size of the attached image
        size: usize,
        /// Configured limit
        limit: usize,
    },

    /// The upload or the append failed; nothing was stored.
    #[error("Network error: {0}")]
    Network(#[source] folio_core::Error),

    /// The image was uploaded but the comment append failed.
    #[error("Comment not saved after image upload to {blob_url}")]
    PartialFailure {
        /// URL of the uploaded, now unreferenced, image
        blob_url: String,
        /// Append failure
        #[source]
        source: folio_core::Error,
    },
}

impl SubmitError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        SubmitError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Text for the error banner under the comment form.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::InFlight => "Your comment is still being posted.".to_string(),
            SubmitError::Validation { .. } => "Please enter your name and a comment.".to_string(),
            SubmitError::ImageTooLarge { limit, .. } => format!(
                "Profile image must be {} MB or smaller.",
                limit / (1024 * 1024)
            ),
            SubmitError::Network(_) | SubmitError::PartialFailure { .. } => {
                NETWORK_FAILURE_MESSAGE.to_string()
            }
        }
    }

    /// Returns `true` if submitting the same draft again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SubmitError::InFlight | SubmitError::Network(_) | SubmitError::PartialFailure { .. }
        )
    }

    /// URL of an image left behind by a failed append.
    pub fn orphaned_blob(&self) -> Option<&str> {
        match self {
            SubmitError::PartialFailure { blob_url, .. } => Some(blob_url),
            _ => None,
        }
    }
}
