//! Token signing and cookie configuration

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Minimum accepted length for either signing secret.
///
/// Shorter secrets make HS256 tokens brute-forceable offline, so the server
/// refuses to start with one. This is a startup precondition, not a runtime
/// check.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Name of the cookie that carries the refresh token.
pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

/// JWT authentication configuration.
///
/// Access and refresh tokens are signed with two distinct secrets so that
/// one class of token can never be verified under the other's key.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Secret for signing short-lived access tokens
    pub access_token_secret: String,

    /// Secret for signing long-lived refresh tokens
    pub refresh_token_secret: String,

    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,

    /// Refresh token expiry in days
    pub refresh_token_expiry_days: i64,

    /// Name of the HTTP-only refresh token cookie
    #[serde(default = "default_cookie_name")]
    pub refresh_cookie_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: String::from("taskboard-dev-access-secret-0123456789abcdef"),
            refresh_token_secret: String::from("taskboard-dev-refresh-secret-0123456789abcdef"),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
            refresh_cookie_name: default_cookie_name(),
        }
    }
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// `JWT_ACCESS_SECRET` and `JWT_REFRESH_SECRET` are required; expiry
    /// windows fall back to 15 minutes / 7 days.
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_token_secret = required_var("JWT_ACCESS_SECRET")?;
        let refresh_token_secret = required_var("JWT_REFRESH_SECRET")?;

        let access_token_expiry_minutes = optional_parsed("JWT_ACCESS_EXPIRY_MINUTES", 15)?;
        let refresh_token_expiry_days = optional_parsed("JWT_REFRESH_EXPIRY_DAYS", 7)?;

        let config = Self {
            access_token_secret,
            refresh_token_secret,
            access_token_expiry_minutes,
            refresh_token_expiry_days,
            refresh_cookie_name: default_cookie_name(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject secrets too short to resist offline brute force.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token_secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::WeakSecret {
                name: "JWT_ACCESS_SECRET",
            });
        }
        if self.refresh_token_secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::WeakSecret {
                name: "JWT_REFRESH_SECRET",
            });
        }
        Ok(())
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry_minutes = minutes;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry_days = days;
        self
    }

    /// Refresh cookie max age in seconds, matching the token expiry
    pub fn refresh_cookie_max_age_seconds(&self) -> i64 {
        self.refresh_token_expiry_days * 86_400
    }
}

fn default_cookie_name() -> String {
    String::from(REFRESH_COOKIE_NAME)
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar { name })
}

fn optional_parsed(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar { name }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_expiry_windows() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_expiry_minutes, 15);
        assert_eq!(config.refresh_token_expiry_days, 7);
        assert_eq!(config.refresh_cookie_name, "refresh_token");
    }

    #[test]
    fn test_default_secrets_pass_validation() {
        // The development defaults must themselves satisfy the length rule.
        assert!(AuthConfig::default().validate().is_ok());
    }

    #[test]
    fn test_short_access_secret_rejected() {
        let config = AuthConfig {
            access_token_secret: String::from("too-short"),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WeakSecret { name: "JWT_ACCESS_SECRET" })
        ));
    }

    #[test]
    fn test_short_refresh_secret_rejected() {
        let config = AuthConfig {
            refresh_token_secret: String::from("x").repeat(MIN_SECRET_LENGTH - 1),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WeakSecret { name: "JWT_REFRESH_SECRET" })
        ));
    }

    #[test]
    fn test_builder_expiry_overrides() {
        let config = AuthConfig::default()
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_days(14);
        assert_eq!(config.access_token_expiry_minutes, 30);
        assert_eq!(config.refresh_cookie_max_age_seconds(), 14 * 86_400);
    }
}
