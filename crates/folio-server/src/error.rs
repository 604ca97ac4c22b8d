//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use folio_site::SubmitError;

/// Errors a handler can return.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiError {
    /// The request body could not be used.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A requested file is not there.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Comment submission failed.
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// Any other site failure.
    #[error(transparent)]
    Core(#[from] folio_core::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Submit(e) => match e {
                SubmitError::InFlight => StatusCode::CONFLICT,
                SubmitError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                SubmitError::ImageTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_GATEWAY,
            },
            ApiError::Core(e) if e.is_retryable() => StatusCode::BAD_GATEWAY,
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Submit(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::MalformedPayload("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(SubmitError::InFlight).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(SubmitError::Network(folio_core::Error::remote("down"))).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(folio_core::Error::config("bad")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_submit_errors_use_user_message() {
        let err = ApiError::from(SubmitError::Network(folio_core::Error::remote("down")));
        assert_eq!(err.message(), folio_site::NETWORK_FAILURE_MESSAGE);
    }
}
