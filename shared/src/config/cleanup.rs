//! Background token cleanup configuration

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Default interval between batch cleanup runs: 24 hours.
pub const DEFAULT_CLEANUP_INTERVAL_SECONDS: u64 = 86_400;

/// Settings for the periodic expired-token cleanup task
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CleanupSettings {
    /// Seconds between batch runs
    pub interval_seconds: u64,

    /// Whether the background task runs at all
    pub enabled: bool,
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_CLEANUP_INTERVAL_SECONDS,
            enabled: true,
        }
    }
}

impl CleanupSettings {
    /// Load from `CLEANUP_INTERVAL_SECONDS` / `CLEANUP_ENABLED`
    pub fn from_env() -> Result<Self, ConfigError> {
        let interval_seconds = match std::env::var("CLEANUP_INTERVAL_SECONDS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
                name: "CLEANUP_INTERVAL_SECONDS",
            })?,
            Err(_) => DEFAULT_CLEANUP_INTERVAL_SECONDS,
        };
        let enabled = match std::env::var("CLEANUP_ENABLED") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
                name: "CLEANUP_ENABLED",
            })?,
            Err(_) => true,
        };
        Ok(Self {
            interval_seconds,
            enabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_defaults_to_daily() {
        let settings = CleanupSettings::default();
        assert_eq!(settings.interval_seconds, 86_400);
        assert!(settings.enabled);
    }
}
