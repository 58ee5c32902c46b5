//! Mock user store for testing.
//!
//! Backs both `UserRepository` and `CredentialStore` with one map, the same
//! shape the real adapter has: the token set lives on the user record, so a
//! sweep's write is immediately visible to the next user load.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError};

use super::r#trait::UserRepository;
use crate::repositories::credentials::CredentialStore;

/// In-memory user store for service tests
#[derive(Default)]
pub struct MockUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    /// Users for whom `replace_tokens` fails, for batch fault-tolerance tests
    fail_replace_for: Arc<RwLock<HashSet<Uuid>>>,
}

impl MockUserStore {
    /// Create an empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user directly, bypassing the registration flow
    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Read a user back for assertions
    pub async fn get_user(&self, id: Uuid) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    /// Make `replace_tokens` fail for one user
    pub async fn fail_replace_for(&self, id: Uuid) {
        self.fail_replace_for.write().await.insert(id);
    }
}

#[async_trait]
impl UserRepository for MockUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let needle = email.to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == needle)
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::Conflict.into());
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_last_login(&self, id: Uuid) -> Result<(), DomainError> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.record_login();
        }
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.password_hash = password_hash.to_string();
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<User>, DomainError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
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
            .users
            .read()
            .await
            .values()
            .filter(|u| !u.refresh_tokens.is_empty())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CredentialStore for MockUserStore {
    async fn add_token(&self, user_id: Uuid, token: &str) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        match users.get_mut(&user_id) {
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
        if let Some(user) = self.users.write().await.get_mut(&user_id) {
            user.refresh_tokens.remove(token);
        }
        Ok(())
    }

    async fn clear_tokens(&self, user_id: Uuid) -> Result<(), DomainError> {
        if let Some(user) = self.users.write().await.get_mut(&user_id) {
            user.refresh_tokens.clear();
        }
        Ok(())
    }

    async fn replace_tokens(
        &self,
        user_id: Uuid,
        tokens: HashSet<String>,
    ) -> Result<(), DomainError> {
        if self.fail_replace_for.read().await.contains(&user_id) {
            return Err(DomainError::Internal {
                message: "simulated store failure".to_string(),
            });
        }
        if let Some(user) = self.users.write().await.get_mut(&user_id) {
            user.refresh_tokens = tokens;
        }
        Ok(())
    }

    async fn contains(&self, user_id: Uuid, token: &str) -> Result<bool, DomainError> {
        Ok(self
            .users
            .read()
            .await
            .get(&user_id)
            .map(|u| u.refresh_tokens.contains(token))
            .unwrap_or(false))
    }
}
