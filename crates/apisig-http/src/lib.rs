//! HTTP service layer for HMAC HTTP Signature authentication.
//!
//! This crate puts [`apisig_auth::SignatureVerifier`] in front of an
//! application handler, providing:
//!
//! - **Handler trait**: Defines the boundary between HTTP and business logic
//! - **Service**: Hyper `Service` implementation that verifies every request
//! - **Response helpers**: JSON success/error response formatting

pub mod dispatch;
pub mod error;
pub mod response;
pub mod service;

pub use response::ApiResponseBody;
pub use dispatch::{AuthenticatedHandler, AuthenticatedKey, HandlerFuture};
pub use error::ApiError;
pub use service::{SignatureAuthConfig, SignatureAuthService};
