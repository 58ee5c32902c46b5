//! Business services orchestrating domain operations.

pub mod session;
pub mod token;

pub use session::{CleanupConfig, CleanupService, PasswordHasher, SessionService};
pub use token::{TokenCodec, TokenConfig};
