//! Request freshness checks against the `date` header.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::AuthError;

/// Check that the request's `date` header lies within `lifetime` seconds of `now`.
///
/// The check only runs when `date` is one of the signed `headers`, the request
/// carries a non-empty `date` header, and `lifetime` is set. In every other
/// case the request passes untouched.
///
/// # Errors
///
/// - [`AuthError::MalformedDateHeader`] if the `date` value cannot be parsed
///   or the request carries more than one `date` line
/// - [`AuthError::RequestExpired`] if the distance between `now` and the
///   declared date is at least `lifetime` seconds, in either direction
pub fn check_freshness(
    headers: &[String],
    parts: &http::request::Parts,
    lifetime: Option<u64>,
    now: DateTime<Utc>,
) -> Result<(), AuthError> {
    let Some(lifetime) = lifetime.filter(|l| *l > 0) else {
        return Ok(());
    };
    if !headers.iter().any(|h| h == "date") {
        return Ok(());
    }
    let lines: Vec<&http::HeaderValue> = parts
        .headers
        .get_all(http::header::DATE)
        .iter()
        .collect();
    let raw = match lines.as_slice() {
        [] => return Ok(()),
        [raw] if raw.is_empty() => return Ok(()),
        [raw] => *raw,
        _ => {
            tracing::debug!(lines = lines.len(), "request carries repeated date header");
            return Err(AuthError::MalformedDateHeader);
        }
    };

    let declared = raw
        .to_str()
        .ok()
        .and_then(parse_http_date)
        .ok_or(AuthError::MalformedDateHeader)?;

    let age = now.signed_duration_since(declared).num_seconds().unsigned_abs();
    if age >= lifetime {
        tracing::debug!(age, lifetime, "request date outside freshness window");
        return Err(AuthError::RequestExpired);
    }

    Ok(())
}

/// Parse an HTTP date string into a `DateTime<Utc>`.
///
/// Accepts:
/// - IMF-fixdate / RFC 2822 (e.g. `Sun, 06 Nov 1994 08:49:37 GMT`)
/// - RFC 3339 (e.g. `1994-11-06T08:49:37Z`)
/// - JavaScript `Date#toString` output
///   (e.g. `Sun Nov 06 1994 08:49:37 GMT+0000 (Coordinated Universal Time)`)
#[must_use]
pub fn parse_http_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%a, %d %b %Y %H:%M:%S GMT") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Drop the parenthesised zone name that `Date#toString` appends.
    let without_zone_name = s.split_once(" (").map_or(s, |(head, _)| head);
    DateTime::parse_from_str(without_zone_name, "%a %b %d %Y %H:%M:%S GMT%z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
