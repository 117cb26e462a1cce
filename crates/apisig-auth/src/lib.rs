//! HMAC HTTP Signature request authentication.
//!
//! This crate verifies incoming HTTP requests signed with a shared secret
//! using the `Authorization: Signature ...` scheme. It supports `hmac-sha1`,
//! `hmac-sha256` and `hmac-sha512`, signs over an explicit list of headers
//! (including the `(request-target)` pseudo-header), and rejects requests whose
//! `date` header falls outside a configurable freshness window.
//!
//! # Overview
//!
//! A client computes an HMAC over a signing string built from selected
//! request headers and sends it along with its key id. The verifier rebuilds
//! the same signing string, looks up the secret for the key id through a
//! [`SecretResolver`], and compares the two in constant time.
//!
//! # Usage
//!
//! ```rust
//! use apisig_auth::config::VerifierConfig;
//! use apisig_auth::resolver::StaticSecretResolver;
//! use apisig_auth::verify::SignatureVerifier;
//!
//! let resolver = StaticSecretResolver::new(vec![
//!     ("client-1".to_owned(), "s3cr3t".to_owned()),
//! ]);
//! let verifier = SignatureVerifier::new(resolver, VerifierConfig::default());
//!
//! // In a request handler:
//! // let result = verifier.verify(&parts).await?;
//! // tracing::info!(key_id = %result.key_id, "authenticated");
//! ```
//!
//! # Modules
//!
//! - [`config`] - Verifier configuration
//! - [`digest`] - HMAC computation and constant-time comparison
//! - [`error`] - Authentication error types
//! - [`freshness`] - `date` header freshness check
//! - [`params`] - `Authorization` header parsing
//! - [`resolver`] - Secret resolver trait and adapters
//! - [`sign`] - Client-side signing
//! - [`signing`] - Signing string construction
//! - [`verify`] - The verification pipeline

pub mod config;
pub mod digest;
pub mod error;
pub mod freshness;
pub mod params;
pub mod resolver;
pub mod sign;
pub mod signing;
pub mod verify;

pub use config::VerifierConfig;
pub use error::{AuthError, AuthErrorKind, BoxError};
pub use params::{SignatureAlgorithm, SignatureParameters, parse_authorization_header};
pub use resolver::{
    AsyncFnSecretResolver, FnSecretResolver, SecretKey, SecretResolver, StaticSecretResolver,
};
pub use verify::{AuthResult, SignatureVerifier};
