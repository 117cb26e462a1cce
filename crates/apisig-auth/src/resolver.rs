//! Secret resolution.
//!
//! This module defines the [`SecretResolver`] trait for looking up the shared
//! secret behind a key id, along with adapters for the common shapes a lookup
//! takes: an in-memory table ([`StaticSecretResolver`]), a blocking function
//! ([`FnSecretResolver`]) and a function returning a future
//! ([`AsyncFnSecretResolver`]).
//!
//! Whatever the shape, the verifier awaits a single `resolve` call. Errors are
//! returned to the caller as-is inside [`AuthError::SecretResolution`].
//!
//! [`AuthError::SecretResolution`]: crate::error::AuthError::SecretResolution

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use async_trait::async_trait;

use crate::error::BoxError;

/// A shared secret used as the HMAC key.
///
/// The `Debug` output never shows the key material.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    /// Create a secret from raw bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw key material.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

impl From<String> for SecretKey {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl From<&str> for SecretKey {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for SecretKey {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

/// Returned by [`StaticSecretResolver`] when the key id is not registered.
#[derive(Debug, thiserror::Error)]
#[error("Unknown key id: {0}")]
pub struct UnknownKeyId(pub String);

/// Trait for looking up the shared secret for a key id.
///
/// Implementations may back this with a database, a remote key service, a
/// configuration file, or anything else. The request parts are passed along so
/// that resolvers can make tenant- or route-specific decisions.
#[async_trait]
pub trait SecretResolver: Send + Sync {
    /// Resolve the secret for `key_id`.
    ///
    /// # Errors
    ///
    /// Any error is surfaced unchanged as the verification result.
    async fn resolve(
        &self,
        parts: &http::request::Parts,
        key_id: &str,
    ) -> Result<SecretKey, BoxError>;
}

/// A simple in-memory resolver backed by a `HashMap`.
///
/// # Examples
///
/// ```
/// use apisig_auth::resolver::StaticSecretResolver;
///
/// let resolver = StaticSecretResolver::new(vec![
///     ("client-1".to_owned(), "s3cr3t".to_owned()),
/// ]);
/// assert!(resolver.contains("client-1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticSecretResolver {
    secrets: HashMap<String, SecretKey>,
}

impl StaticSecretResolver {
    /// Create a resolver from an iterable of `(key_id, secret)` pairs.
    pub fn new<S: Into<SecretKey>>(secrets: impl IntoIterator<Item = (String, S)>) -> Self {
        Self {
            secrets: secrets
                .into_iter()
                .map(|(id, secret)| (id, secret.into()))
                .collect(),
        }
    }

    /// Whether `key_id` is registered.
    #[must_use]
    pub fn contains(&self, key_id: &str) -> bool {
        self.secrets.contains_key(key_id)
    }

    /// Number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Whether no keys are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

#[async_trait]
impl SecretResolver for StaticSecretResolver {
    async fn resolve(
        &self,
        _parts: &http::request::Parts,
        key_id: &str,
    ) -> Result<SecretKey, BoxError> {
        self.secrets
            .get(key_id)
            .cloned()
            .ok_or_else(|| UnknownKeyId(key_id.to_owned()).into())
    }
}

/// Adapts a blocking lookup function.
///
/// The function runs inline on the calling task, so it should be cheap; use
/// [`AsyncFnSecretResolver`] for anything that performs I/O.
pub struct FnSecretResolver<F>(F);

impl<F> FnSecretResolver<F>
where
    F: Fn(&http::request::Parts, &str) -> Result<SecretKey, BoxError> + Send + Sync,
{
    /// Wrap `f` as a resolver.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> fmt::Debug for FnSecretResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnSecretResolver").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> SecretResolver for FnSecretResolver<F>
where
    F: Fn(&http::request::Parts, &str) -> Result<SecretKey, BoxError> + Send + Sync,
{
    async fn resolve(
        &self,
        parts: &http::request::Parts,
        key_id: &str,
    ) -> Result<SecretKey, BoxError> {
        (self.0)(parts, key_id)
    }
}

/// Adapts a function that returns a future.
///
/// The function receives an owned copy of the key id so the returned future
/// does not borrow from the request.
pub struct AsyncFnSecretResolver<F>(F);

impl<F, Fut> AsyncFnSecretResolver<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<SecretKey, BoxError>> + Send,
{
    /// Wrap `f` as a resolver.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> fmt::Debug for AsyncFnSecretResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AsyncFnSecretResolver").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> SecretResolver for AsyncFnSecretResolver<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<SecretKey, BoxError>> + Send,
{
    async fn resolve(
        &self,
        _parts: &http::request::Parts,
        key_id: &str,
    ) -> Result<SecretKey, BoxError> {
        (self.0)(key_id.to_owned()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_parts() -> http::request::Parts {
        http::Request::builder().body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_should_return_secret_for_known_key() {
        let resolver = StaticSecretResolver::new(vec![("abc".to_owned(), "sekret")]);

        let secret = resolver.resolve(&empty_parts(), "abc").await.unwrap();
        assert_eq!(secret.as_bytes(), b"sekret");
    }

    #[tokio::test]
    async fn test_should_return_error_for_unknown_key() {
        let resolver = StaticSecretResolver::new(Vec::<(String, String)>::new());

        let err = resolver.resolve(&empty_parts(), "nope").await.unwrap_err();
        assert!(err.downcast_ref::<UnknownKeyId>().is_some());
        assert_eq!(err.to_string(), "Unknown key id: nope");
    }

    #[tokio::test]
    async fn test_should_adapt_blocking_function() {
        let resolver = FnSecretResolver::new(
            |parts: &http::request::Parts, key_id: &str| -> Result<SecretKey, BoxError> {
                assert_eq!(parts.method, http::Method::GET);
                Ok(SecretKey::from(format!("secret-for-{key_id}")))
            },
        );

        let secret = resolver.resolve(&empty_parts(), "k1").await.unwrap();
        assert_eq!(secret.as_bytes(), b"secret-for-k1");
    }

    #[tokio::test]
    async fn test_should_adapt_async_function() {
        let resolver = AsyncFnSecretResolver::new(|key_id: String| async move {
            tokio::task::yield_now().await;
            if key_id == "k1" {
                Ok(SecretKey::from("deferred"))
            } else {
                Err(BoxError::from("lookup failed"))
            }
        });

        let secret = resolver.resolve(&empty_parts(), "k1").await.unwrap();
        assert_eq!(secret.as_bytes(), b"deferred");

        let err = resolver.resolve(&empty_parts(), "k2").await.unwrap_err();
        assert_eq!(err.to_string(), "lookup failed");
    }

    #[test]
    fn test_should_redact_secret_in_debug_output() {
        let secret = SecretKey::from("do-not-print");
        assert_eq!(format!("{secret:?}"), "SecretKey(..)");
    }
}
