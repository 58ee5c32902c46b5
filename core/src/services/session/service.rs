//! Main session service implementation.
//!
//! Orchestrates the token lifecycle against the user repository and the
//! credential store: register/login issue pairs and record the refresh
//! token, refresh validates the double-check invariant (cryptographic
//! verification AND store membership) before minting a new access token,
//! and the sweep reconciles stored sets with cryptographic validity.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::user::{User, UserProfile, UserRole};
use crate::domain::value_objects::{AuthResponse, CleanupReport, RefreshedAccess};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{CredentialStore, UserRepository};
use crate::services::token::TokenCodec;

use super::password::PasswordHasher;

/// Session service for managing the complete authentication token lifecycle
pub struct SessionService<U, C, P>
where
    U: UserRepository,
    C: CredentialStore,
    P: PasswordHasher,
{
    /// User repository for account records
    users: Arc<U>,
    /// Credential store holding each user's live refresh tokens
    credentials: Arc<C>,
    /// Password hashing primitive
    hasher: Arc<P>,
    /// Token codec for issuance and verification
    codec: Arc<TokenCodec>,
}

impl<U, C, P> SessionService<U, C, P>
where
    U: UserRepository,
    C: CredentialStore,
    P: PasswordHasher,
{
    /// Create a new session service
    pub fn new(users: Arc<U>, credentials: Arc<C>, hasher: Arc<P>, codec: Arc<TokenCodec>) -> Self {
        Self {
            users,
            credentials,
            hasher,
            codec,
        }
    }

    /// Register a new account and open its first session.
    ///
    /// Fails with `Conflict` if the email is already taken. The new user
    /// starts active, with the freshly issued refresh token as the sole
    /// entry in its credential set.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<AuthResponse> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::Conflict.into());
        }

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .users
            .create(User::new(
                name.to_string(),
                email.to_string(),
                password_hash,
                UserRole::User,
            ))
            .await?;

        let pair = self.codec.issue_pair(user.id, &user.email, user.role)?;
        self.credentials.add_token(user.id, &pair.refresh_token).await?;

        info!(user_id = %user.id, "registered new user");
        Ok(AuthResponse::from_token_pair(user.profile(), pair))
    }

    /// Authenticate with email and password and open a new session.
    ///
    /// Unknown email and wrong password produce the same
    /// `InvalidCredentials`; only a caller holding correct credentials
    /// learns that the account is disabled. On success the user's stored
    /// set is swept before the new refresh token is appended.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResponse> {
        let mut user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => return Err(AuthError::InvalidCredentials.into()),
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.is_active {
            return Err(AuthError::AccountDisabled.into());
        }

        self.users.update_last_login(user.id).await?;
        user.record_login();

        let kept = self.sweep_expired_tokens(&user).await?;

        let pair = self.codec.issue_pair(user.id, &user.email, user.role)?;
        self.credentials.add_token(user.id, &pair.refresh_token).await?;

        debug!(user_id = %user.id, live_tokens = kept + 1, "login opened new session");
        Ok(AuthResponse::from_token_pair(user.profile(), pair))
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The presented token must verify cryptographically AND still be a
    /// member of its owner's stored set; a missing user, a disabled
    /// account, and a revoked token all collapse into the same
    /// `InvalidToken` so a bearer learns nothing about account state.
    /// The refresh token itself is not rotated.
    pub async fn refresh(&self, presented: &str) -> DomainResult<RefreshedAccess> {
        let claims = match self.codec.verify_refresh(presented) {
            Ok(claims) => claims,
            Err(TokenError::Expired) => {
                // The failing call is also the moment the dead entry gets
                // pruned from storage.
                self.prune_expired_presented(presented).await;
                return Err(AuthError::InvalidToken.into());
            }
            Err(_) => return Err(AuthError::InvalidToken.into()),
        };

        let user = match self.users.find_by_id(claims.id).await? {
            Some(user) if user.is_active => user,
            _ => return Err(AuthError::InvalidToken.into()),
        };

        if !self.credentials.contains(user.id, presented).await? {
            warn!(user_id = %user.id, "refresh attempted with revoked token");
            return Err(AuthError::InvalidToken.into());
        }

        self.sweep_expired_tokens(&user).await?;

        let access_token = self.codec.issue_access(user.id, &user.email, user.role)?;
        Ok(RefreshedAccess {
            access_token,
            expires_in: self.codec.access_expiry_seconds(),
        })
    }

    /// End one device's session by removing exactly that refresh token.
    ///
    /// Idempotent: succeeds even if the token was already absent.
    pub async fn logout(&self, user_id: Uuid, presented: &str) -> DomainResult<()> {
        self.credentials.remove_token(user_id, presented).await?;
        debug!(user_id = %user_id, "logout removed refresh token");
        Ok(())
    }

    /// End every session for the user by clearing the stored set
    pub async fn logout_all(&self, user_id: Uuid) -> DomainResult<()> {
        self.credentials.clear_tokens(user_id).await?;
        info!(user_id = %user_id, "logout-all cleared refresh tokens");
        Ok(())
    }

    /// Fetch the public profile of an account
    pub async fn me(&self, user_id: Uuid) -> DomainResult<UserProfile> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("user {user_id}"),
            })?;
        Ok(user.profile())
    }

    /// Change the account password and end every open session.
    ///
    /// Requires the current password; clearing the credential set forces
    /// all devices, including the one making this call, to log in again.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("user {user_id}"),
            })?;

        if !self.hasher.verify(current, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials.into());
        }

        let password_hash = self.hasher.hash(new_password)?;
        self.users.update_password(user_id, &password_hash).await?;
        self.credentials.clear_tokens(user_id).await?;

        info!(user_id = %user_id, "password changed, all sessions ended");
        Ok(())
    }

    /// Enable or disable an account (admin operation).
    ///
    /// Deactivation also clears the credential set: a disabled account
    /// holds no live sessions.
    pub async fn set_account_active(
        &self,
        user_id: Uuid,
        active: bool,
    ) -> DomainResult<UserProfile> {
        let user = self
            .users
            .set_active(user_id, active)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("user {user_id}"),
            })?;

        if !active {
            self.credentials.clear_tokens(user_id).await?;
            info!(user_id = %user_id, "account deactivated, sessions cleared");
        }
        Ok(user.profile())
    }

    /// Prune tokens that no longer verify from the user's stored set.
    ///
    /// Partitions a snapshot of the set by `verify_refresh`; when anything
    /// fell out, installs the surviving subset with one atomic replace.
    /// Returns how many tokens remained valid, so callers can tell whether
    /// a write occurred by comparing against the snapshot size.
    pub async fn sweep_expired_tokens(&self, user: &User) -> DomainResult<usize> {
        let mut valid = HashSet::with_capacity(user.refresh_tokens.len());
        let mut removed = 0usize;

        for token in &user.refresh_tokens {
            if self.codec.verify_refresh(token).is_ok() {
                valid.insert(token.clone());
            } else {
                removed += 1;
            }
        }

        let kept = valid.len();
        if removed > 0 {
            self.credentials.replace_tokens(user.id, valid).await?;
            debug!(user_id = %user.id, removed, kept, "swept expired refresh tokens");
        }
        Ok(kept)
    }

    /// Sweep every user with stored tokens (system-wide batch).
    ///
    /// A failure for one user is logged and recorded in the report; it
    /// never aborts the rest of the batch.
    pub async fn cleanup_all_expired_tokens(&self) -> DomainResult<CleanupReport> {
        let users = self.users.find_with_refresh_tokens().await?;
        let mut report = CleanupReport::default();

        for user in users {
            let before = user.refresh_tokens.len();
            match self.sweep_expired_tokens(&user).await {
                Ok(kept) => report.record_user(before - kept),
                Err(err) => {
                    warn!(user_id = %user.id, error = %err, "skipping user during token cleanup");
                    report.errors.push(format!("user {}: {}", user.id, err));
                }
            }
        }

        info!(
            users_affected = report.users_affected,
            tokens_removed = report.tokens_removed,
            errors = report.errors.len(),
            "expired token cleanup finished"
        );
        Ok(report)
    }

    /// Best-effort sweep for the owner of an expired-but-authentic token.
    ///
    /// Only reached after the signature checked out; a forged token never
    /// gets here, so the decoded subject can be trusted.
    async fn prune_expired_presented(&self, presented: &str) {
        let Some(claims) = self.codec.decode_refresh_ignoring_expiry(presented) else {
            return;
        };
        match self.users.find_by_id(claims.id).await {
            Ok(Some(user)) => {
                if let Err(err) = self.sweep_expired_tokens(&user).await {
                    warn!(user_id = %user.id, error = %err, "failed to prune expired refresh token");
                }
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "failed to load user while pruning expired token"),
        }
    }
}
