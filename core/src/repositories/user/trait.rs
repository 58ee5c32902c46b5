//! User repository trait defining the interface for user persistence.
//!
//! The session layer only ever touches users through this trait; the backing
//! document store is an implementation detail of the infrastructure crate.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Implementations must treat each update as an atomic single-record write so
/// that concurrent session operations converge instead of clobbering each
/// other (see the credential store contract for the token-set side of this).
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with the given ID
    /// * `Err(DomainError)` - Store error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by email address.
    ///
    /// Lookup is case-insensitive; implementations match against the
    /// lowercased form that [`User::new`] stores.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Persist a new user.
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError::Auth(AuthError::Conflict))` - Email already taken
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Stamp the user's last-login time to now
    async fn update_last_login(&self, id: Uuid) -> Result<(), DomainError>;

    /// Replace the stored password hash
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError>;

    /// Enable or disable the account
    ///
    /// # Returns
    /// * `Ok(Some(User))` - The updated user
    /// * `Ok(None)` - No user with the given ID
    async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<User>, DomainError>;

    /// Enumerate users whose refresh-token set is non-empty.
    ///
    /// Backs the system-wide cleanup batch; users without stored tokens have
    /// nothing to sweep and are skipped at the store level.
    async fn find_with_refresh_tokens(&self) -> Result<Vec<User>, DomainError>;
}
