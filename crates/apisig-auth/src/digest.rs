//! Keyed-hash computation and timing-safe signature comparison.
//!
//! The supplied signature is never compared to the computed digest directly.
//! Both are first re-hashed under the same secret, and the two fixed-length
//! results are compared with [`subtle::ConstantTimeEq`]:
//!
//! ```text
//! digest = HMAC(secret, signing_string)
//! h1     = HMAC(secret, digest)
//! h2     = HMAC(secret, base64_decode(signature))
//! valid  = ct_eq(h1, h2)
//! ```

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use subtle::ConstantTimeEq;

use crate::error::AuthError;
use crate::params::SignatureAlgorithm;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

const DECODE_CONFIG: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// Standard alphabet, padding optional.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, DECODE_CONFIG);

/// URL-safe alphabet, padding optional.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, DECODE_CONFIG);

/// Compute `HMAC(algorithm, key, data)` and return the raw bytes.
#[must_use]
pub fn keyed_hash(algorithm: SignatureAlgorithm, key: &[u8], data: &[u8]) -> Vec<u8> {
    match algorithm {
        SignatureAlgorithm::HmacSha1 => mac_bytes::<HmacSha1>(key, data),
        SignatureAlgorithm::HmacSha256 => mac_bytes::<HmacSha256>(key, data),
        SignatureAlgorithm::HmacSha512 => mac_bytes::<HmacSha512>(key, data),
    }
}

/// Compute the base64-encoded signature of `signing_string`.
///
/// This is the value a client places in the `signature` directive.
///
/// # Examples
///
/// ```
/// use apisig_auth::digest::compute_signature;
/// use apisig_auth::params::SignatureAlgorithm;
///
/// let sig = compute_signature(SignatureAlgorithm::HmacSha256, b"key", "date: now");
/// assert_eq!(sig.len(), 44);
/// ```
#[must_use]
pub fn compute_signature(
    algorithm: SignatureAlgorithm,
    secret: &[u8],
    signing_string: &str,
) -> String {
    base64::engine::general_purpose::STANDARD.encode(keyed_hash(
        algorithm,
        secret,
        signing_string.as_bytes(),
    ))
}

/// Verify `signature` (base64) against `signing_string` under `secret`.
///
/// # Errors
///
/// Returns [`AuthError::InvalidSignature`] if the signature does not match or
/// is not valid base64.
pub fn verify_signature(
    algorithm: SignatureAlgorithm,
    secret: &[u8],
    signing_string: &str,
    signature: &str,
) -> Result<(), AuthError> {
    let provided = decode_signature(signature).ok_or(AuthError::InvalidSignature)?;

    let digest = keyed_hash(algorithm, secret, signing_string.as_bytes());
    let h1 = keyed_hash(algorithm, secret, &digest);
    let h2 = keyed_hash(algorithm, secret, &provided);

    if h1.as_slice().ct_eq(h2.as_slice()).into() {
        Ok(())
    } else {
        Err(AuthError::InvalidSignature)
    }
}

/// Decode a base64 signature, accepting either alphabet with or without padding.
fn decode_signature(signature: &str) -> Option<Vec<u8>> {
    STANDARD_LENIENT
        .decode(signature)
        .or_else(|_| URL_SAFE_LENIENT.decode(signature))
        .ok()
}

/// Compute a MAC over `data` and return the raw bytes.
fn mac_bytes<M: Mac + KeyInit>(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = <M as KeyInit>::new_from_slice(key).expect("HMAC can accept keys of any length");
    Mac::update(&mut mac, data);
    mac.finalize().into_bytes().to_vec()
}
