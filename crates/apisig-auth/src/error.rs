//! Error types for HTTP Signature authentication.
//!
//! Every verification failure is an [`AuthError`]. The `Display` output of each
//! variant is the exact message returned to clients, so the wording here is
//! part of the observable contract and must not drift.

use std::fmt;

/// Boxed error type returned by secret resolvers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while verifying a signed request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The `Authorization` header is missing from the request.
    #[error("Missing required HTTP headers : authorization")]
    MissingAuthorizationHeader,

    /// The `Authorization` header does not use the `Signature` scheme.
    #[error(
        "Bad value format for the HTTP header Authorization. Expected format : Signature [params]"
    )]
    BadScheme,

    /// One or more of `keyId`, `algorithm`, `signature` is absent or empty.
    #[error("Missing required signature parameters : {}", .0.join(", "))]
    MissingSignatureParameters(Vec<String>),

    /// The `algorithm` parameter names an algorithm this verifier does not support.
    #[error("Unsupported algorithm")]
    UnsupportedAlgorithm,

    /// Headers named in the `headers` parameter are absent from the request.
    #[error("Missing required HTTP headers : {}", .0.join(", "))]
    MissingSigningHeaders(Vec<String>),

    /// The `date` header could not be parsed as an HTTP date.
    #[error(
        "Bad value format for the HTTP header date. Expected format : <day-name>, <day> <month> <year> <hour>:<minute>:<second> GMT"
    )]
    MalformedDateHeader,

    /// The `date` header lies outside the configured freshness window.
    #[error("Request has expired")]
    RequestExpired,

    /// The computed signature does not match the provided signature.
    #[error("Authorization signature is invalid")]
    InvalidSignature,

    /// The secret resolver failed. The resolver's error is passed through untouched.
    #[error(transparent)]
    SecretResolution(BoxError),
}

/// Classification of an [`AuthError`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    /// See [`AuthError::MissingAuthorizationHeader`].
    MissingAuthorizationHeader,
    /// See [`AuthError::BadScheme`].
    BadScheme,
    /// See [`AuthError::MissingSignatureParameters`].
    MissingSignatureParameters,
    /// See [`AuthError::UnsupportedAlgorithm`].
    UnsupportedAlgorithm,
    /// See [`AuthError::MissingSigningHeaders`].
    MissingSigningHeaders,
    /// See [`AuthError::MalformedDateHeader`].
    MalformedDateHeader,
    /// See [`AuthError::RequestExpired`].
    RequestExpired,
    /// See [`AuthError::InvalidSignature`].
    InvalidSignature,
    /// See [`AuthError::SecretResolution`].
    SecretResolution,
}

impl AuthErrorKind {
    /// Stable identifier for logs and metrics labels.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingAuthorizationHeader => "MissingAuthorizationHeader",
            Self::BadScheme => "BadScheme",
            Self::MissingSignatureParameters => "MissingSignatureParameters",
            Self::UnsupportedAlgorithm => "UnsupportedAlgorithm",
            Self::MissingSigningHeaders => "MissingSigningHeaders",
            Self::MalformedDateHeader => "MalformedDateHeader",
            Self::RequestExpired => "RequestExpired",
            Self::InvalidSignature => "InvalidSignature",
            Self::SecretResolution => "SecretResolution",
        }
    }
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AuthError {
    /// Return the payload-free classification of this error.
    #[must_use]
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            Self::MissingAuthorizationHeader => AuthErrorKind::MissingAuthorizationHeader,
            Self::BadScheme => AuthErrorKind::BadScheme,
            Self::MissingSignatureParameters(_) => AuthErrorKind::MissingSignatureParameters,
            Self::UnsupportedAlgorithm => AuthErrorKind::UnsupportedAlgorithm,
            Self::MissingSigningHeaders(_) => AuthErrorKind::MissingSigningHeaders,
            Self::MalformedDateHeader => AuthErrorKind::MalformedDateHeader,
            Self::RequestExpired => AuthErrorKind::RequestExpired,
            Self::InvalidSignature => AuthErrorKind::InvalidSignature,
            Self::SecretResolution(_) => AuthErrorKind::SecretResolution,
        }
    }

    /// Suggested HTTP status for this error.
    ///
    /// Resolver failures carry no status of their own; hosts usually map them
    /// to `401 Unauthorized`, which is what this returns.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            Self::MissingAuthorizationHeader
            | Self::InvalidSignature
            | Self::SecretResolution(_) => http::StatusCode::UNAUTHORIZED,
            Self::BadScheme
            | Self::MissingSignatureParameters(_)
            | Self::UnsupportedAlgorithm
            | Self::MissingSigningHeaders(_)
            | Self::MalformedDateHeader
            | Self::RequestExpired => http::StatusCode::BAD_REQUEST,
        }
    }
}

/// Errors raised while building verifier configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value could not be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidValue {
        /// The setting name (environment variable or field).
        name: &'static str,
        /// The rejected raw value.
        value: String,
    },
}
