//! HTTP-facing error type.

use apisig_auth::AuthError;

/// An error rendered to the client as a JSON body.
///
/// The shape mirrors the conventional `{"statusCode", "error", "message"}`
/// payload, where `error` is the reason phrase of the status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// HTTP status of the response.
    pub status_code: http::StatusCode,
    /// Reason phrase for `status_code`.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    /// Create an error with the given status and message.
    #[must_use]
    pub fn new(status_code: http::StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code,
            error: status_code
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_owned(),
            message: message.into(),
        }
    }

    /// 500 Internal Server Error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(http::StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<&AuthError> for ApiError {
    fn from(err: &AuthError) -> Self {
        Self::new(err.status_code(), err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::from(&err)
    }
}
