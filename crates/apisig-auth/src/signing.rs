//! Signing string construction.
//!
//! The signing string is one line per covered header, in the order the client
//! listed them, joined with `\n` and without a trailing newline:
//!
//! ```text
//! (request-target): get /foo?param=value
//! host: example.org
//! date: Tue, 07 Jun 2014 20:51:35 GMT
//! ```

use crate::error::AuthError;

/// Pseudo-header covering the request method and target.
pub const REQUEST_TARGET: &str = "(request-target)";

/// Build the signing string for `headers` from the request parts.
///
/// `(request-target)` expands to the lowercased method followed by the path
/// and query exactly as received. Every other name is looked up
/// case-insensitively; repeated field lines are joined with `, `.
///
/// # Errors
///
/// Returns [`AuthError::MissingSigningHeaders`] listing every name that could
/// not be resolved, in the order encountered.
///
/// # Examples
///
/// ```
/// use apisig_auth::signing::build_signing_string;
///
/// let (parts, ()) = http::Request::builder()
///     .method("POST")
///     .uri("/foo?a=1")
///     .header("host", "example.org")
///     .body(())
///     .unwrap()
///     .into_parts();
///
/// let headers = vec!["(request-target)".to_owned(), "host".to_owned()];
/// let signing_string = build_signing_string(&headers, &parts).unwrap();
/// assert_eq!(signing_string, "(request-target): post /foo?a=1\nhost: example.org");
/// ```
pub fn build_signing_string(
    headers: &[String],
    parts: &http::request::Parts,
) -> Result<String, AuthError> {
    let mut lines = Vec::with_capacity(headers.len());
    let mut missing = Vec::new();

    for name in headers {
        if name == REQUEST_TARGET {
            lines.push(format!(
                "{REQUEST_TARGET}: {} {}",
                parts.method.as_str().to_lowercase(),
                request_target(&parts.uri)
            ));
        } else if let Some(value) = header_value(&parts.headers, name) {
            lines.push(format!("{name}: {value}"));
        } else {
            missing.push(name.clone());
        }
    }

    if missing.is_empty() {
        Ok(lines.join("\n"))
    } else {
        Err(AuthError::MissingSigningHeaders(missing))
    }
}

/// The path and query of the request, untouched.
fn request_target(uri: &http::Uri) -> &str {
    uri.path_and_query()
        .map_or_else(|| uri.path(), http::uri::PathAndQuery::as_str)
}

/// Fetch a header value, joining repeated field lines.
///
/// Returns `None` when the header is absent, empty, or not valid visible text.
fn header_value(headers: &http::HeaderMap, name: &str) -> Option<String> {
    let values = headers
        .get_all(name)
        .iter()
        .map(|v| v.to_str().ok())
        .collect::<Option<Vec<&str>>>()?;

    let joined = values.join(", ");
    (!joined.is_empty()).then_some(joined)
}
