//! Shared application state injected into every handler.

use std::sync::Arc;

use tb_core::repositories::{CredentialStore, UserRepository};
use tb_core::services::session::{PasswordHasher, SessionService};
use tb_core::services::token::TokenCodec;
use tb_shared::{AuthConfig, Environment};

/// Application state shared across workers.
///
/// Generic over the storage and hashing implementations so tests can run
/// against the same factory as production.
pub struct AppState<U, C, P>
where
    U: UserRepository + 'static,
    C: CredentialStore + 'static,
    P: PasswordHasher + 'static,
{
    /// Session lifecycle service
    pub sessions: Arc<SessionService<U, C, P>>,
    /// Token codec, shared with the auth middleware
    pub codec: Arc<TokenCodec>,
    /// Cookie naming and expiry settings
    pub auth: AuthConfig,
    /// Runtime environment, drives the Secure cookie flag
    pub environment: Environment,
}
