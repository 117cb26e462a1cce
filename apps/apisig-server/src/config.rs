//! Server configuration.

use apisig_auth::error::ConfigError;
use apisig_auth::{SecretKey, StaticSecretResolver, VerifierConfig};

/// Default bind address.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";

/// Configuration for the apisig server.
///
/// # Environment Variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `LISTEN` | `0.0.0.0:8080` | Bind address |
/// | `LOG_LEVEL` | `info` | Log level filter |
/// | `REQUEST_LIFETIME` | `300` | Freshness window in seconds (`0`/`off` disables) |
/// | `API_KEYS` | *(empty)* | `id:secret` pairs separated by commas |
#[derive(Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub listen: String,
    /// Log level filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Verifier settings.
    pub verifier: VerifierConfig,
    /// Registered `(key_id, secret)` pairs.
    pub api_keys: Vec<(String, String)>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key_ids: Vec<&str> = self.api_keys.iter().map(|(id, _)| id.as_str()).collect();
        f.debug_struct("ServerConfig")
            .field("listen", &self.listen)
            .field("log_level", &self.log_level)
            .field("verifier", &self.verifier)
            .field("api_keys", &key_ids)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_owned(),
            log_level: "info".to_owned(),
            verifier: VerifierConfig::default(),
            api_keys: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self {
            verifier: VerifierConfig::from_lookup(&lookup)?,
            ..Self::default()
        };

        if let Some(v) = lookup("LISTEN") {
            config.listen = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = lookup("API_KEYS") {
            config.api_keys = parse_api_keys(&v)?;
        }

        Ok(config)
    }

    /// Build the secret resolver for the configured keys.
    #[must_use]
    pub fn resolver(&self) -> StaticSecretResolver {
        StaticSecretResolver::new(
            self.api_keys
                .iter()
                .map(|(id, secret)| (id.clone(), SecretKey::from(secret.as_str()))),
        )
    }

    /// Freshness window in seconds, or `None` when disabled.
    #[must_use]
    pub fn request_lifetime(&self) -> Option<u64> {
        self.verifier.effective_lifetime()
    }
}

/// Parse `id:secret,id:secret` into pairs.
///
/// Entries are trimmed and empty entries skipped. The secret is everything
/// after the first `:`, so it may itself contain colons.
pub fn parse_api_keys(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((id, secret)) if !id.is_empty() && !secret.is_empty() => {
                Ok((id.to_owned(), secret.to_owned()))
            }
            _ => Err(ConfigError::InvalidValue {
                name: "API_KEYS",
                value: entry.to_owned(),
            }),
        })
        .collect()
}
