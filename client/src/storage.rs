//! Durable session persistence.
//!
//! The current session is one small JSON file. A missing or unreadable
//! file means "no stored session"; corruption is logged and discarded
//! rather than surfaced, since the user can always log in again.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::ClientError;

/// The signed-in user as the server describes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Server-assigned user id
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Role string as issued by the server
    pub role: String,
}

/// Everything the client persists between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// The signed-in user
    pub user: SessionUser,
    /// Current access token
    pub access_token: String,
    /// Long-lived refresh token
    pub refresh_token: String,
}

/// File-backed store for the current session
pub struct SessionStorage {
    path: PathBuf,
}

impl SessionStorage {
    /// Create a store backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the stored session, if a readable one exists
    pub async fn load(&self) -> Option<StoredSession> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "could not read session file");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "stored session is corrupt, ignoring");
                None
            }
        }
    }

    /// Persist the session, creating parent directories as needed
    pub async fn save(&self, session: &StoredSession) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| ClientError::Storage(err.to_string()))?;
        }

        let json = serde_json::to_string_pretty(session)
            .map_err(|err| ClientError::Storage(err.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|err| ClientError::Storage(err.to_string()))
    }

    /// Delete the stored session. Idempotent.
    pub async fn clear(&self) -> Result<(), ClientError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ClientError::Storage(err.to_string())),
        }
    }
}
