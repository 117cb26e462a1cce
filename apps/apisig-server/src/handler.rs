//! Echo handler reporting the authenticated caller.

use apisig_http::dispatch::HandlerFuture;
use apisig_http::response::json_response;
use apisig_http::{ApiError, AuthenticatedHandler, AuthenticatedKey};
use bytes::Bytes;

/// Responds with `{"keyId", "method", "path"}` for every authenticated request.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl AuthenticatedHandler for EchoHandler {
    fn handle(&self, req: http::Request<Bytes>) -> HandlerFuture {
        let key_id = req
            .extensions()
            .get::<AuthenticatedKey>()
            .map(|k| k.key_id.clone());
        let method = req.method().to_string();
        let path = req.uri().path().to_owned();

        Box::pin(async move {
            serde_json::to_vec(&serde_json::json!({
                "keyId": key_id,
                "method": method,
                "path": path,
            }))
            .map(|json| json_response(http::StatusCode::OK, json))
            .map_err(|e| ApiError::internal_error(e.to_string()))
        })
    }
}
