//! Handler trait and request dispatch.

use std::future::Future;
use std::pin::Pin;

use apisig_auth::{AuthResult, SignatureAlgorithm};
use bytes::Bytes;

use crate::error::ApiError;
use crate::response::ApiResponseBody;

/// The boxed future returned by [`AuthenticatedHandler::handle`].
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<http::Response<ApiResponseBody>, ApiError>> + Send>>;

/// Identity of the client that signed a request.
///
/// Inserted into the request extensions once verification succeeds. Requests
/// on public paths carry no `AuthenticatedKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedKey {
    /// The verified key id.
    pub key_id: String,
    /// The algorithm the client signed with.
    pub algorithm: SignatureAlgorithm,
    /// The headers covered by the signature.
    pub signed_headers: Vec<String>,
}

impl From<AuthResult> for AuthenticatedKey {
    fn from(result: AuthResult) -> Self {
        Self {
            key_id: result.key_id,
            algorithm: result.algorithm,
            signed_headers: result.signed_headers,
        }
    }
}

/// Trait that the application logic behind the authentication layer implements.
///
/// The handler receives the request with its body fully buffered. For
/// protected paths the request extensions hold an [`AuthenticatedKey`].
pub trait AuthenticatedHandler: Send + Sync + 'static {
    /// Handle an authenticated request and produce an HTTP response.
    fn handle(&self, req: http::Request<Bytes>) -> HandlerFuture;
}

/// Dispatch a request to the handler.
pub async fn dispatch_request<H: AuthenticatedHandler>(
    handler: &H,
    req: http::Request<Bytes>,
) -> Result<http::Response<ApiResponseBody>, ApiError> {
    tracing::debug!(
        method = %req.method(),
        path = %req.uri().path(),
        key_id = req.extensions().get::<AuthenticatedKey>().map(|k| k.key_id.as_str()),
        "dispatching request"
    );
    handler.handle(req).await
}
