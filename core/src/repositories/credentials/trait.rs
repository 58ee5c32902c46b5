//! Credential store trait: the per-user set of live refresh tokens.
//!
//! Membership in this set is the only server-side revocation mechanism.
//! A refresh token is usable if and only if it verifies cryptographically
//! AND is still present in its owner's set; either check alone is
//! insufficient, which is what makes logout effective against bearer tokens
//! that would otherwise stay valid until expiry.

use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::DomainError;

/// Per-user membership set of currently-valid refresh tokens
///
/// All operations act on a single user's record and must be applied as
/// atomic single-record updates: `add_token` merges one entry in,
/// `remove_token` takes one entry out, and `replace_tokens` installs a
/// filtered snapshot in one write. Under concurrent access interleavings
/// must converge to a consistent set; a token added between a sweep's read
/// and its replace may legitimately be lost, and implementations should keep
/// that window as small as they can. No cross-user locking is required.
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use std::collections::HashSet;
/// use uuid::Uuid;
/// use tb_core::repositories::CredentialStore;
/// use tb_core::errors::DomainError;
///
/// struct MyStore {
///     // backing document store handle
/// }
///
/// #[async_trait]
/// impl CredentialStore for MyStore {
///     async fn add_token(&self, user_id: Uuid, token: &str) -> Result<(), DomainError> {
///         // $addToSet-style merge on the user record
///         Ok(())
///     }
///     # async fn remove_token(&self, user_id: Uuid, token: &str) -> Result<(), DomainError> { Ok(()) }
///     # async fn clear_tokens(&self, user_id: Uuid) -> Result<(), DomainError> { Ok(()) }
///     # async fn replace_tokens(&self, user_id: Uuid, tokens: HashSet<String>) -> Result<(), DomainError> { Ok(()) }
///     # async fn contains(&self, user_id: Uuid, token: &str) -> Result<bool, DomainError> { Ok(false) }
/// }
/// ```
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Append a token to the user's set.
    ///
    /// Set semantics: adding a token that is already present is an
    /// idempotent no-op, not an error.
    ///
    /// # Returns
    /// * `Err(DomainError::NotFound)` - No user owns this set
    async fn add_token(&self, user_id: Uuid, token: &str) -> Result<(), DomainError>;

    /// Remove exactly that token from the user's set.
    ///
    /// A no-op (not an error) if the token, or the user, is absent; logout
    /// must stay idempotent.
    async fn remove_token(&self, user_id: Uuid, token: &str) -> Result<(), DomainError>;

    /// Empty the user's set.
    ///
    /// Used by logout-all and by forced deactivation.
    async fn clear_tokens(&self, user_id: Uuid) -> Result<(), DomainError>;

    /// Atomically replace the user's set with `tokens`.
    ///
    /// Used by the sweep to install the post-pruning set in one write.
    async fn replace_tokens(
        &self,
        user_id: Uuid,
        tokens: HashSet<String>,
    ) -> Result<(), DomainError>;

    /// Membership test backing the revocation double-check.
    ///
    /// Returns `Ok(false)` for an unknown user.
    async fn contains(&self, user_id: Uuid, token: &str) -> Result<bool, DomainError>;
}
