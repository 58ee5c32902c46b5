//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Token signing secrets, expiry windows, and cookie naming
//! - `cleanup` - Background expired-token cleanup settings
//! - `environment` - Environment detection
//! - `server` - HTTP server bind configuration

pub mod auth;
pub mod cleanup;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::{AuthConfig, MIN_SECRET_LENGTH, REFRESH_COOKIE_NAME};
pub use cleanup::{CleanupSettings, DEFAULT_CLEANUP_INTERVAL_SECONDS};
pub use environment::Environment;
pub use server::ServerConfig;

/// Errors raised while loading or validating configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is absent
    #[error("required environment variable {name} is not set")]
    MissingVar { name: &'static str },

    /// An environment variable is present but unparsable
    #[error("environment variable {name} has an invalid value")]
    InvalidVar { name: &'static str },

    /// A signing secret fails the minimum-length precondition
    #[error("{name} must be at least {MIN_SECRET_LENGTH} characters")]
    WeakSecret { name: &'static str },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment the process runs in
    pub environment: Environment,

    /// Server bind configuration
    pub server: ServerConfig,

    /// Token signing configuration
    pub auth: AuthConfig,

    /// Background cleanup configuration
    pub cleanup: CleanupSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            cleanup: CleanupSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load the full configuration from the environment.
    ///
    /// Fails fast on missing secrets, unparsable values, or secrets below
    /// the minimum length; the server must not come up half-configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            cleanup: CleanupSettings::from_env()?,
        })
    }
}
