//! Error types for the todos API client.

use thiserror::Error;

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Failures the API client can surface.
///
/// The reducer never sees these: a failed effect logs the error and
/// produces no feedback action. They exist for direct users of the client
/// and for the logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request could not be sent or the connection failed.
    #[error("Request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("Server returned status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, best effort
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Returns `true` for server-side failures (5xx).
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_classified() {
        let err = ApiError::Status {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(err.is_server_error());

        let err = ApiError::Status {
            status: 404,
            message: "missing".to_string(),
        };
        assert!(!err.is_server_error());
        assert!(!ApiError::Request("boom".to_string()).is_server_error());
    }

    #[test]
    fn errors_render_with_context() {
        let err = ApiError::Decode("missing field `todos`".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to decode response: missing field `todos`"
        );
    }
}
