//! Access-token expiry introspection.
//!
//! The client holds no signing secrets, so token payloads are decoded
//! without signature verification. The `exp` claim is used only to
//! schedule renewal; the server stays the sole authority on validity.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::error::ClientError;

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: i64,
}

/// Decode the expiry timestamp of a JWT without verifying its signature
pub fn expiry_of(token: &str) -> Result<DateTime<Utc>, ClientError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;

    let data = jsonwebtoken::decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|err| ClientError::Token(err.to_string()))?;

    DateTime::from_timestamp(data.claims.exp, 0)
        .ok_or_else(|| ClientError::Token("exp claim out of range".to_string()))
}

/// Whether the token expires within `window` from now, or already has.
///
/// An undecodable token counts as expiring, which routes it into the
/// renewal path instead of being presented to the server as-is.
pub fn expires_within(token: &str, window: Duration) -> bool {
    match expiry_of(token) {
        Ok(expiry) => expiry - Utc::now() <= window,
        Err(_) => true,
    }
}
