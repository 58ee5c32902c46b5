//! Shared utilities and common types for the TaskBoard server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error response structures shared by the API surface

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CleanupSettings, ConfigError, Environment, ServerConfig,
    MIN_SECRET_LENGTH,
};
pub use errors::{error_codes, ErrorResponse};
