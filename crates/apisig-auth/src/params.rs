//! Parsing of the `Authorization: Signature ...` directive.
//!
//! Accepted grammar:
//!
//! ```text
//! authorization := "Signature" SP directive *( "," directive )
//! directive     := key "=" DQUOTE value DQUOTE
//! ```
//!
//! Directives are split on every `,` before quotes are considered, so a quoted
//! value cannot contain a comma. Whitespace around a fragment is kept, and the
//! closing quote is assumed rather than checked.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

/// The authorization scheme token, compared case-insensitively.
const SCHEME: &str = "signature";

/// Directives every signature must carry, in the order they are reported when missing.
const REQUIRED_PARAMETERS: [&str; 3] = ["keyid", "algorithm", "signature"];

/// Header list used when the client omits the `headers` directive.
const DEFAULT_HEADERS: &str = "date";

/// Supported keyed-hash algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// `hmac-sha1`
    HmacSha1,
    /// `hmac-sha256`
    HmacSha256,
    /// `hmac-sha512`
    HmacSha512,
}

impl SignatureAlgorithm {
    /// Every algorithm accepted by the verifier.
    pub const ALL: [Self; 3] = [Self::HmacSha1, Self::HmacSha256, Self::HmacSha512];

    /// The token used in the `algorithm` directive.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HmacSha1 => "hmac-sha1",
            Self::HmacSha256 => "hmac-sha256",
            Self::HmacSha512 => "hmac-sha512",
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or(AuthError::UnsupportedAlgorithm)
    }
}

/// Parsed components of an `Authorization: Signature` header.
///
/// Format:
/// ```text
/// Signature keyId="abc",algorithm="hmac-sha256",
///   headers="(request-target) host date",signature="<base64>"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParameters {
    /// Identifier used to look up the shared secret.
    pub key_id: String,
    /// The keyed-hash algorithm.
    pub algorithm: SignatureAlgorithm,
    /// Lowercase header names covered by the signature, in signing order.
    pub headers: Vec<String>,
    /// The base64-encoded signature as supplied by the client.
    pub signature: String,
}

/// Parse an `Authorization` header value into [`SignatureParameters`].
///
/// # Errors
///
/// - [`AuthError::BadScheme`] if the value does not start with `Signature`
/// - [`AuthError::MissingSignatureParameters`] if `keyId`, `algorithm` or
///   `signature` is missing or empty
/// - [`AuthError::UnsupportedAlgorithm`] if `algorithm` is not an HMAC variant
///   this crate knows
///
/// # Examples
///
/// ```
/// use apisig_auth::params::{SignatureAlgorithm, parse_authorization_header};
///
/// let params = parse_authorization_header(
///     r#"Signature keyId="abc",algorithm="hmac-sha256",signature="c2ln""#,
/// )
/// .unwrap();
/// assert_eq!(params.key_id, "abc");
/// assert_eq!(params.algorithm, SignatureAlgorithm::HmacSha256);
/// assert_eq!(params.headers, vec!["date"]);
/// ```
pub fn parse_authorization_header(header: &str) -> Result<SignatureParameters, AuthError> {
    let rest = strip_scheme(header).ok_or(AuthError::BadScheme)?;
    let mut directives = parse_directives(rest.trim());

    let missing: Vec<String> = REQUIRED_PARAMETERS
        .iter()
        .filter(|name| directives.get(**name).is_none_or(String::is_empty))
        .map(|name| (*name).to_owned())
        .collect();
    if !missing.is_empty() {
        return Err(AuthError::MissingSignatureParameters(missing));
    }

    let headers = parse_header_list(directives.get("headers").map(String::as_str));
    let algorithm = directives
        .get("algorithm")
        .map_or(Err(AuthError::UnsupportedAlgorithm), |a| a.parse())?;

    Ok(SignatureParameters {
        key_id: directives.remove("keyid").unwrap_or_default(),
        algorithm,
        headers,
        signature: directives.remove("signature").unwrap_or_default(),
    })
}

/// Strip the leading scheme token, returning the remainder.
fn strip_scheme(header: &str) -> Option<&str> {
    let prefix = header.get(..SCHEME.len())?;
    prefix
        .eq_ignore_ascii_case(SCHEME)
        .then(|| &header[SCHEME.len()..])
}

/// Split the directive list into a map of lowercase key to raw value.
///
/// The key is everything before the first `="`, untrimmed. The value runs from
/// just after `="` to the fragment's last character, which is dropped whatever
/// it is. Fragments without `="` are ignored; a repeated key keeps the last
/// value seen.
fn parse_directives(input: &str) -> HashMap<String, String> {
    input
        .split(',')
        .filter_map(|fragment| {
            let index = fragment.find("=\"")?;
            let key = fragment[..index].to_ascii_lowercase();
            Some((key, directive_value(fragment, index + 2).to_owned()))
        })
        .collect()
}

/// Slice `fragment` from `start` up to, not including, its last character.
///
/// When `start` lies past that character the bounds are swapped.
fn directive_value(fragment: &str, start: usize) -> &str {
    let end = fragment.char_indices().next_back().map_or(0, |(i, _)| i);
    if start <= end {
        &fragment[start..end]
    } else {
        &fragment[end..start]
    }
}

/// Lowercase and split the `headers` directive, defaulting to `date`.
fn parse_header_list(raw: Option<&str>) -> Vec<String> {
    let names: Vec<String> = raw
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect();

    if names.is_empty() {
        vec![DEFAULT_HEADERS.to_owned()]
    } else {
        names
    }
}
