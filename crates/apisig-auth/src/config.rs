//! Verifier configuration.
//!
//! Provides [`VerifierConfig`], loaded either programmatically through its
//! builder or from environment-style variables via
//! [`VerifierConfig::from_lookup`].

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::ConfigError;

/// Default freshness window, in seconds.
pub const DEFAULT_REQUEST_LIFETIME: u64 = 300;

/// Signature verifier configuration.
///
/// # Examples
///
/// ```
/// use apisig_auth::config::VerifierConfig;
///
/// let config = VerifierConfig::default();
/// assert_eq!(config.request_lifetime, Some(300));
///
/// let config = VerifierConfig::builder().request_lifetime(None).build();
/// assert!(!config.freshness_enabled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct VerifierConfig {
    /// Maximum age of the `date` header in seconds. `None` (or `0`) disables
    /// the freshness check.
    #[builder(default = Some(DEFAULT_REQUEST_LIFETIME))]
    #[serde(default = "default_request_lifetime")]
    pub request_lifetime: Option<u64>,
}

fn default_request_lifetime() -> Option<u64> {
    Some(DEFAULT_REQUEST_LIFETIME)
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            request_lifetime: default_request_lifetime(),
        }
    }
}

impl VerifierConfig {
    /// Load configuration through a variable lookup such as
    /// `|name| std::env::var(name).ok()`.
    ///
    /// | Variable | Default | Notes |
    /// |----------|---------|-------|
    /// | `REQUEST_LIFETIME` | `300` | `0`, `off`, `none` or `disabled` turn the check off |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `REQUEST_LIFETIME` is neither
    /// an integer nor one of the disabling keywords.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup("REQUEST_LIFETIME") {
            config.request_lifetime = parse_lifetime(&v)?;
        }

        Ok(config)
    }

    /// The effective lifetime, treating `Some(0)` as disabled.
    #[must_use]
    pub fn effective_lifetime(&self) -> Option<u64> {
        self.request_lifetime.filter(|l| *l > 0)
    }

    /// Whether the freshness check runs.
    #[must_use]
    pub fn freshness_enabled(&self) -> bool {
        self.effective_lifetime().is_some()
    }
}

/// Parse a lifetime setting.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for anything that is not a
/// non-negative integer or a disabling keyword.
pub fn parse_lifetime(raw: &str) -> Result<Option<u64>, ConfigError> {
    let raw = raw.trim();
    if ["off", "none", "disabled", "false"]
        .iter()
        .any(|kw| raw.eq_ignore_ascii_case(kw))
    {
        return Ok(None);
    }

    let seconds: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
        name: "REQUEST_LIFETIME",
        value: raw.to_owned(),
    })?;
    Ok((seconds > 0).then_some(seconds))
}
