//! Pure token issuance and verification.
//!
//! No I/O happens here: whether a refresh token is still honored is decided
//! by the credential store, not the codec. The codec only answers "was this
//! signed by us, for this purpose, and is it still within its window."

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::token::{AccessClaims, RefreshClaims, TokenPair};
use crate::domain::entities::user::UserRole;
use crate::errors::TokenError;

use super::config::TokenConfig;

/// Issues and verifies the two token classes with two distinct HS256 keys
pub struct TokenCodec {
    config: TokenConfig,
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
    /// Same checks minus expiry; only the expired-token prune path uses this
    lenient_validation: Validation,
}

impl TokenCodec {
    /// Creates a codec from validated configuration
    pub fn new(config: TokenConfig) -> Self {
        let access_encoding = EncodingKey::from_secret(config.access_secret.as_bytes());
        let access_decoding = DecodingKey::from_secret(config.access_secret.as_bytes());
        let refresh_encoding = EncodingKey::from_secret(config.refresh_secret.as_bytes());
        let refresh_decoding = DecodingKey::from_secret(config.refresh_secret.as_bytes());

        let validation = Validation::new(Algorithm::HS256);

        let mut lenient_validation = Validation::new(Algorithm::HS256);
        lenient_validation.validate_exp = false;

        Self {
            config,
            access_encoding,
            access_decoding,
            refresh_encoding,
            refresh_decoding,
            validation,
            lenient_validation,
        }
    }

    /// Signs `{id, email, role}` with the access secret, short expiry
    pub fn issue_access(
        &self,
        user_id: Uuid,
        email: &str,
        role: UserRole,
    ) -> Result<String, TokenError> {
        let claims = AccessClaims::new(
            user_id,
            email.to_string(),
            role,
            Duration::minutes(self.config.access_token_expiry_minutes),
        );
        encode(&Header::new(Algorithm::HS256), &claims, &self.access_encoding)
            .map_err(|_| TokenError::CreationFailed)
    }

    /// Signs `{id, type: "refresh"}` with the refresh secret, long expiry
    pub fn issue_refresh(&self, user_id: Uuid) -> Result<String, TokenError> {
        let claims = RefreshClaims::new(
            user_id,
            Duration::days(self.config.refresh_token_expiry_days),
        );
        encode(&Header::new(Algorithm::HS256), &claims, &self.refresh_encoding)
            .map_err(|_| TokenError::CreationFailed)
    }

    /// Issues a matched access + refresh pair for one subject
    pub fn issue_pair(
        &self,
        user_id: Uuid,
        email: &str,
        role: UserRole,
    ) -> Result<TokenPair, TokenError> {
        let access_token = self.issue_access(user_id, email, role)?;
        let refresh_token = self.issue_refresh(user_id)?;
        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_expiry_seconds(),
            self.config.refresh_expiry_seconds(),
        ))
    }

    /// Verifies an access token: signature, expiry, and the type guard.
    ///
    /// A payload marked `type: "refresh"` is rejected even when its
    /// signature verifies; that closes the confusion hole left open when
    /// both secrets are misconfigured to the same value.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let data = decode::<AccessClaims>(token, &self.access_decoding, &self.validation)
            .map_err(map_decode_error)?;

        if data.claims.is_refresh_typed() {
            return Err(TokenError::WrongType);
        }
        Ok(data.claims)
    }

    /// Verifies a refresh token: signature, expiry, and `type == "refresh"`
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let data = decode::<RefreshClaims>(token, &self.refresh_decoding, &self.validation)
            .map_err(map_decode_error)?;

        if !data.claims.is_refresh() {
            return Err(TokenError::WrongType);
        }
        Ok(data.claims)
    }

    /// Decodes a refresh token whose expiry may have passed.
    ///
    /// Signature and type are still enforced, so the claims can be trusted
    /// to name the real owner. Lets a failing `refresh` call locate the user
    /// whose stored set should be swept; never use this to authorize
    /// anything.
    pub fn decode_refresh_ignoring_expiry(&self, token: &str) -> Option<RefreshClaims> {
        let data =
            decode::<RefreshClaims>(token, &self.refresh_decoding, &self.lenient_validation)
                .ok()?;
        data.claims.is_refresh().then_some(data.claims)
    }

    /// Access token lifetime in seconds, for `expires_in` response fields
    pub fn access_expiry_seconds(&self) -> i64 {
        self.config.access_expiry_seconds()
    }
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    }
}
