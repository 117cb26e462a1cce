//! Authenticating HTTP service implementing the hyper `Service` trait.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use apisig_auth::SignatureVerifier;
use bytes::Bytes;
use http_body_util::BodyExt;

use crate::dispatch::{AuthenticatedHandler, AuthenticatedKey, dispatch_request};
use crate::error::ApiError;
use crate::response::{ApiResponseBody, CONTENT_TYPE, REQUEST_ID_HEADER, error_to_response};

/// Configuration for the authentication layer.
#[derive(Debug, Clone, Default)]
pub struct SignatureAuthConfig {
    /// Request paths that skip signature verification. Matched exactly.
    pub public_paths: Vec<String>,
}

impl SignatureAuthConfig {
    /// Whether `path` bypasses authentication.
    #[must_use]
    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|p| p == path)
    }
}

/// Hyper `Service` that verifies HTTP signatures before dispatching.
///
/// Every request outside [`SignatureAuthConfig::public_paths`] is run through
/// the [`SignatureVerifier`]. Failures are answered with a JSON error and never
/// reach the handler; successes carry an [`AuthenticatedKey`] in their
/// extensions.
pub struct SignatureAuthService<H: AuthenticatedHandler> {
    handler: Arc<H>,
    verifier: SignatureVerifier,
    config: Arc<SignatureAuthConfig>,
}

impl<H: AuthenticatedHandler> SignatureAuthService<H> {
    /// Create a new `SignatureAuthService`.
    pub fn new(handler: Arc<H>, verifier: SignatureVerifier, config: SignatureAuthConfig) -> Self {
        Self {
            handler,
            verifier,
            config: Arc::new(config),
        }
    }
}

impl<H: AuthenticatedHandler> fmt::Debug for SignatureAuthService<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureAuthService")
            .field("verifier", &self.verifier)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<H: AuthenticatedHandler> Clone for SignatureAuthService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            verifier: self.verifier.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H, B> hyper::service::Service<http::Request<B>> for SignatureAuthService<H>
where
    H: AuthenticatedHandler,
    B: http_body::Body + Send + 'static,
    B::Data: Send,
    B::Error: fmt::Display,
{
    type Response = http::Response<ApiResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let verifier = self.verifier.clone();
        let config = Arc::clone(&self.config);
        let request_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let response =
                process_request(req, handler.as_ref(), &verifier, &config, &request_id).await;
            let response = add_common_headers(response, &request_id);
            Ok(response)
        })
    }
}

/// Process a single request through authentication and dispatch.
async fn process_request<H, B>(
    req: http::Request<B>,
    handler: &H,
    verifier: &SignatureVerifier,
    config: &SignatureAuthConfig,
    request_id: &str,
) -> http::Response<ApiResponseBody>
where
    H: AuthenticatedHandler,
    B: http_body::Body + Send,
    B::Error: fmt::Display,
{
    let (mut parts, incoming) = req.into_parts();

    // 1. Authenticate unless the path is public.
    if !config.is_public(parts.uri.path()) {
        match verifier.verify(&parts).await {
            Ok(result) => {
                tracing::debug!(
                    key_id = %result.key_id,
                    algorithm = %result.algorithm,
                    "request authenticated"
                );
                parts.extensions.insert(AuthenticatedKey::from(result));
            }
            Err(err) => {
                tracing::info!(
                    request_id,
                    method = %parts.method,
                    path = %parts.uri.path(),
                    kind = %err.kind(),
                    "request authentication failed"
                );
                return error_to_response(&ApiError::from(&err), request_id);
            }
        }
    }

    // 2. Collect body.
    let body = match collect_body(incoming).await {
        Ok(body) => body,
        Err(err) => return error_to_response(&err, request_id),
    };

    // 3. Dispatch to handler.
    let req = http::Request::from_parts(parts, body);
    match dispatch_request(handler, req).await {
        Ok(response) => response,
        Err(err) => error_to_response(&err, request_id),
    }
}

/// Collect the incoming body into a single `Bytes` buffer.
async fn collect_body<B>(incoming: B) -> Result<Bytes, ApiError>
where
    B: http_body::Body,
    B::Error: fmt::Display,
{
    incoming
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| ApiError::internal_error(format!("Failed to read request body: {e}")))
}

/// Add common response headers to every response.
fn add_common_headers(
    mut response: http::Response<ApiResponseBody>,
    request_id: &str,
) -> http::Response<ApiResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry(REQUEST_ID_HEADER).or_insert(hv);
    }

    headers
        .entry(http::header::CONTENT_TYPE)
        .or_insert(http::HeaderValue::from_static(CONTENT_TYPE));

    headers.insert(
        http::header::SERVER,
        http::HeaderValue::from_static("apisig"),
    );

    response
}
