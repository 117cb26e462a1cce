//! Signature verification.
//!
//! [`SignatureVerifier::verify`] runs the full flow for one request:
//!
//! 1. Read the `Authorization` header.
//! 2. Parse it into [`SignatureParameters`], validating required directives
//!    and the algorithm.
//! 3. Rebuild the signing string from the covered headers.
//! 4. Check the `date` header against the freshness window, if applicable.
//! 5. Resolve the shared secret for the key id (the only await point).
//! 6. Compare the double-hashed digests in constant time.
//!
//! The order is fixed and decides which error a malformed request reports.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::VerifierConfig;
use crate::digest::verify_signature;
use crate::error::AuthError;
use crate::freshness::check_freshness;
use crate::params::{SignatureAlgorithm, SignatureParameters, parse_authorization_header};
use crate::resolver::SecretResolver;
use crate::signing::build_signing_string;

/// The result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    /// The key id that signed the request.
    pub key_id: String,
    /// The algorithm the client used.
    pub algorithm: SignatureAlgorithm,
    /// The headers covered by the signature.
    pub signed_headers: Vec<String>,
}

/// Verifies `Authorization: Signature` headers on incoming requests.
///
/// The verifier is immutable after construction and cheap to clone; a single
/// instance can serve any number of concurrent requests.
#[derive(Clone)]
pub struct SignatureVerifier {
    resolver: Arc<dyn SecretResolver>,
    config: VerifierConfig,
}

impl fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("resolver", &"...")
            .field("config", &self.config)
            .finish()
    }
}

impl SignatureVerifier {
    /// Create a verifier from a resolver and configuration.
    pub fn new(resolver: impl SecretResolver + 'static, config: VerifierConfig) -> Self {
        Self::from_arc(Arc::new(resolver), config)
    }

    /// Create a verifier from a shared resolver.
    #[must_use]
    pub fn from_arc(resolver: Arc<dyn SecretResolver>, config: VerifierConfig) -> Self {
        Self { resolver, config }
    }

    /// The configuration this verifier was built with.
    #[must_use]
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verify a request against the current system time.
    ///
    /// # Errors
    ///
    /// Returns the first [`AuthError`] raised by the verification stages, or
    /// the resolver's own error wrapped in [`AuthError::SecretResolution`].
    pub async fn verify(&self, parts: &http::request::Parts) -> Result<AuthResult, AuthError> {
        self.verify_at(parts, Utc::now()).await
    }

    /// Verify a request, judging freshness relative to `now`.
    ///
    /// # Errors
    ///
    /// See [`SignatureVerifier::verify`].
    pub async fn verify_at(
        &self,
        parts: &http::request::Parts,
        now: DateTime<Utc>,
    ) -> Result<AuthResult, AuthError> {
        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorizationHeader)?
            .to_str()
            .map_err(|_| AuthError::BadScheme)?;

        let params = parse_authorization_header(auth_header)?;

        debug!(
            key_id = %params.key_id,
            algorithm = %params.algorithm,
            headers = ?params.headers,
            "Verifying HTTP signature"
        );

        let signing_string = build_signing_string(&params.headers, parts)?;

        debug!(
            signing_string_len = signing_string.len(),
            "Built signing string"
        );

        check_freshness(
            &params.headers,
            parts,
            self.config.effective_lifetime(),
            now,
        )?;

        let secret = self
            .resolver
            .resolve(parts, &params.key_id)
            .await
            .map_err(|e| {
                debug!(key_id = %params.key_id, error = %e, "Secret resolution failed");
                AuthError::SecretResolution(e)
            })?;

        let SignatureParameters {
            key_id,
            algorithm,
            headers,
            signature,
        } = params;

        match verify_signature(algorithm, secret.as_bytes(), &signing_string, &signature) {
            Ok(()) => {
                debug!(key_id = %key_id, "Signature verification succeeded");
                Ok(AuthResult {
                    key_id,
                    algorithm,
                    signed_headers: headers,
                })
            }
            Err(err) => {
                debug!(key_id = %key_id, "Signature mismatch");
                Err(err)
            }
        }
    }
}
