//! Session lifecycle: registration, login, refresh, logout, and the
//! expired-token sweep.

pub mod cleanup;
pub mod password;
pub mod service;

pub use cleanup::{CleanupConfig, CleanupService};
pub use password::PasswordHasher;
pub use service::SessionService;
