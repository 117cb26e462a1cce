//! Gateway service in front of the authentication layer.
//!
//! Health-check endpoints (`/health`, `/_health`) are answered here without
//! authentication. Everything else goes through [`SignatureAuthService`].

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use apisig_http::response::json_response;
use apisig_http::{ApiResponseBody, AuthenticatedHandler, SignatureAuthService};
use hyper::service::Service;

/// Server version reported in health check responses.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Gateway that intercepts health checks and authenticates everything else.
#[derive(Debug)]
pub struct GatewayService<H: AuthenticatedHandler> {
    auth: SignatureAuthService<H>,
}

impl<H: AuthenticatedHandler> GatewayService<H> {
    /// Create a new gateway wrapping an authenticating service.
    pub fn new(auth: SignatureAuthService<H>) -> Self {
        Self { auth }
    }
}

impl<H: AuthenticatedHandler> Clone for GatewayService<H> {
    fn clone(&self) -> Self {
        Self {
            auth: self.auth.clone(),
        }
    }
}

impl<H, B> Service<http::Request<B>> for GatewayService<H>
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
        if is_health_check(req.method(), req.uri().path()) {
            return Box::pin(async { Ok(health_check_response()) });
        }

        self.auth.call(req)
    }
}

/// Check if the request targets a health endpoint.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    (*method == http::Method::GET || *method == http::Method::HEAD)
        && (path == "/health" || path == "/_health")
}

/// Produce the health check response.
fn health_check_response() -> http::Response<ApiResponseBody> {
    let body = format!(r#"{{"status":"running","version":"{VERSION}"}}"#);
    json_response(http::StatusCode::OK, body.into_bytes())
}
