//! Client-side request signing.
//!
//! The counterpart to [`crate::verify`]: produces the `Authorization` header
//! value a client sends. Used by tests and by clients written in Rust.

use chrono::{DateTime, Utc};

use crate::digest::compute_signature;
use crate::error::AuthError;
use crate::params::SignatureAlgorithm;
use crate::signing::build_signing_string;

/// Format a timestamp as an IMF-fixdate (`Sun, 06 Nov 1994 08:49:37 GMT`).
#[must_use]
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Build an `Authorization: Signature ...` header value for a request.
///
/// `headers` lists the covered header names in signing order. Names are
/// lowercased before use. An empty list signs `date` alone.
///
/// # Errors
///
/// Returns [`AuthError::MissingSigningHeaders`] if the request lacks any of the
/// listed headers.
///
/// # Examples
///
/// ```
/// use apisig_auth::params::SignatureAlgorithm;
/// use apisig_auth::sign::authorization_header;
///
/// let (parts, ()) = http::Request::builder()
///     .uri("/ping")
///     .header("date", "Sun, 06 Nov 1994 08:49:37 GMT")
///     .body(())
///     .unwrap()
///     .into_parts();
///
/// let value = authorization_header(
///     &parts,
///     "client-1",
///     SignatureAlgorithm::HmacSha256,
///     &["(request-target)", "date"],
///     b"s3cr3t",
/// )
/// .unwrap();
/// assert!(value.starts_with(r#"Signature keyId="client-1",algorithm="hmac-sha256""#));
/// ```
pub fn authorization_header(
    parts: &http::request::Parts,
    key_id: &str,
    algorithm: SignatureAlgorithm,
    headers: &[&str],
    secret: &[u8],
) -> Result<String, AuthError> {
    let names: Vec<String> = if headers.is_empty() {
        vec![http::header::DATE.as_str().to_owned()]
    } else {
        headers.iter().map(|h| h.to_ascii_lowercase()).collect()
    };

    let signing_string = build_signing_string(&names, parts)?;
    let signature = compute_signature(algorithm, secret, &signing_string);

    Ok(format!(
        r#"Signature keyId="{key_id}",algorithm="{algorithm}",headers="{}",signature="{signature}""#,
        names.join(" ")
    ))
}
