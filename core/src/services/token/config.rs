//! Configuration for the token codec

use tb_shared::AuthConfig;

/// Configuration for the token codec.
///
/// Secrets arrive here already validated against the minimum-length rule by
/// the configuration layer; the codec treats them as trusted key material.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Signing secret for access tokens
    pub access_secret: String,
    /// Signing secret for refresh tokens, distinct from the access secret
    pub refresh_secret: String,
    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,
    /// Refresh token expiry in days
    pub refresh_token_expiry_days: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_secret: "taskboard-dev-access-secret-0123456789abcdef".to_string(),
            refresh_secret: "taskboard-dev-refresh-secret-0123456789abcdef".to_string(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        }
    }
}

impl TokenConfig {
    /// Access token lifetime in seconds, for client-facing `expires_in` fields
    pub fn access_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_minutes * 60
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_expiry_seconds(&self) -> i64 {
        self.refresh_token_expiry_days * 86_400
    }
}

impl From<&AuthConfig> for TokenConfig {
    fn from(auth: &AuthConfig) -> Self {
        Self {
            access_secret: auth.access_token_secret.clone(),
            refresh_secret: auth.refresh_token_secret.clone(),
            access_token_expiry_minutes: auth.access_token_expiry_minutes,
            refresh_token_expiry_days: auth.refresh_token_expiry_days,
        }
    }
}
