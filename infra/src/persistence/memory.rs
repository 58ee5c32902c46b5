//! In-memory implementation of the user repository and credential store.
//!
//! Users live in a single map guarded by one async RwLock, with a secondary
//! email index for login lookups. Both traits operate on the same records:
//! the refresh-token set is a field of the user, so there is no separate
//! token table to drift out of sync.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use tb_core::domain::entities::user::User;
use tb_core::errors::{AuthError, DomainError};
use tb_core::repositories::{CredentialStore, UserRepository};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    /// Lowercased email -> user id
    by_email: HashMap<String, Uuid>,
}

/// In-process store for users and their refresh tokens
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let inner = self.inner.read().await;
        let id = match inner.by_email.get(&email.to_lowercase()) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(inner.users.get(&id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut inner = self.inner.write().await;
        if inner.by_email.contains_key(&user.email) {
            return Err(AuthError::Conflict.into());
        }
        inner.by_email.insert(user.email.clone(), user.id);
        inner.users.insert(user.id, user.clone());
        debug!(user_id = %user.id, "created user");
        Ok(user)
    }

    async fn update_last_login(&self, id: Uuid) -> Result<(), DomainError> {
        if let Some(user) = self.inner.write().await.users.get_mut(&id) {
            user.record_login();
        }
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError> {
        if let Some(user) = self.inner.write().await.users.get_mut(&id) {
            user.password_hash = password_hash.to_string();
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<User>, DomainError> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&id).map(|user| {
            if active {
                user.activate();
            } else {
                user.deactivate();
            }
            user.clone()
        }))
    }

    async fn find_with_refresh_tokens(&self) -> Result<Vec<User>, DomainError> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .filter(|u| !u.refresh_tokens.is_empty())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn add_token(&self, user_id: Uuid, token: &str) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&user_id) {
            Some(user) => {
                user.refresh_tokens.insert(token.to_string());
                Ok(())
            }
            None => Err(DomainError::NotFound {
                resource: format!("user {user_id}"),
            }),
        }
    }

    async fn remove_token(&self, user_id: Uuid, token: &str) -> Result<(), DomainError> {
        if let Some(user) = self.inner.write().await.users.get_mut(&user_id) {
            user.refresh_tokens.remove(token);
        }
        Ok(())
    }

    async fn clear_tokens(&self, user_id: Uuid) -> Result<(), DomainError> {
        if let Some(user) = self.inner.write().await.users.get_mut(&user_id) {
            user.refresh_tokens.clear();
        }
        Ok(())
    }

    async fn replace_tokens(
        &self,
        user_id: Uuid,
        tokens: HashSet<String>,
    ) -> Result<(), DomainError> {
        if let Some(user) = self.inner.write().await.users.get_mut(&user_id) {
            user.refresh_tokens = tokens;
        }
        Ok(())
    }

    async fn contains(&self, user_id: Uuid, token: &str) -> Result<bool, DomainError> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .get(&user_id)
            .map(|u| u.refresh_tokens.contains(token))
            .unwrap_or(false))
    }
}
