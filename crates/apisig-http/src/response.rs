//! JSON response construction and error formatting.

use bytes::Bytes;
use http_body_util::Full;

use crate::error::ApiError;

/// Response body type: every response is a single buffered frame.
pub type ApiResponseBody = Full<Bytes>;

/// Content type for JSON responses.
pub const CONTENT_TYPE: &str = "application/json";

/// Header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Serialize an [`ApiError`] into a JSON body.
///
/// ```json
/// {
///   "statusCode": 401,
///   "error": "Unauthorized",
///   "message": "Authorization signature is invalid"
/// }
/// ```
#[must_use]
pub fn error_to_json(error: &ApiError) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "statusCode": error.status_code.as_u16(),
        "error": error.error,
        "message": error.message,
    }))
    .expect("JSON serialization of error cannot fail")
}

/// Convert an [`ApiError`] into a complete HTTP error response.
#[must_use]
pub fn error_to_response(error: &ApiError, request_id: &str) -> http::Response<ApiResponseBody> {
    let mut builder = http::Response::builder()
        .status(error.status_code)
        .header(http::header::CONTENT_TYPE, CONTENT_TYPE)
        .header(REQUEST_ID_HEADER, request_id);

    if error.status_code == http::StatusCode::UNAUTHORIZED {
        builder = builder.header(http::header::WWW_AUTHENTICATE, "Signature");
    }

    builder
        .body(Full::new(Bytes::from(error_to_json(error))))
        .expect("valid error response")
}

/// Build a JSON response with the given status.
///
/// The request id header is added later by the service.
#[must_use]
pub fn json_response(status: http::StatusCode, json: Vec<u8>) -> http::Response<ApiResponseBody> {
    http::Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, CONTENT_TYPE)
        .body(Full::new(Bytes::from(json)))
        .expect("valid JSON response")
}
