//! Value objects shared across the domain layer.

pub mod auth_response;
pub mod cleanup_report;

pub use auth_response::{AuthResponse, RefreshedAccess};
pub use cleanup_report::CleanupReport;
