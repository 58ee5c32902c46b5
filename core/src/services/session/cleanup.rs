//! Periodic cleanup of expired refresh tokens.
//!
//! Wraps the session service's batch sweep in a background task that
//! runs once at startup and then on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::domain::value_objects::CleanupReport;
use crate::errors::DomainResult;
use crate::repositories::{CredentialStore, UserRepository};
use crate::services::session::{PasswordHasher, SessionService};

/// Default cleanup interval of 24 hours
pub const DEFAULT_CLEANUP_INTERVAL_SECONDS: u64 = 86_400;

/// Configuration for the cleanup task
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// Seconds between cleanup runs
    pub interval_seconds: u64,
    /// Whether the background task should run at all
    pub enabled: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_CLEANUP_INTERVAL_SECONDS,
            enabled: true,
        }
    }
}

impl CleanupConfig {
    /// Create a config with a custom interval
    pub fn with_interval(interval_seconds: u64) -> Self {
        Self {
            interval_seconds,
            ..Self::default()
        }
    }
}

impl From<&tb_shared::CleanupSettings> for CleanupConfig {
    fn from(settings: &tb_shared::CleanupSettings) -> Self {
        Self {
            interval_seconds: settings.interval_seconds,
            enabled: settings.enabled,
        }
    }
}

/// Background service that periodically sweeps expired refresh tokens
pub struct CleanupService<U, C, P>
where
    U: UserRepository + 'static,
    C: CredentialStore + 'static,
    P: PasswordHasher + 'static,
{
    sessions: Arc<SessionService<U, C, P>>,
    config: CleanupConfig,
}

impl<U, C, P> CleanupService<U, C, P>
where
    U: UserRepository + 'static,
    C: CredentialStore + 'static,
    P: PasswordHasher + 'static,
{
    /// Create a new cleanup service
    pub fn new(sessions: Arc<SessionService<U, C, P>>, config: CleanupConfig) -> Self {
        Self { sessions, config }
    }

    /// Run a single cleanup pass over every user with stored tokens
    pub async fn run_once(&self) -> DomainResult<CleanupReport> {
        debug!("starting expired refresh token cleanup pass");
        self.sessions.cleanup_all_expired_tokens().await
    }

    /// Spawn the periodic cleanup loop.
    ///
    /// The interval's first tick completes immediately, so one pass runs
    /// right at startup before the task settles into its cadence. A
    /// failed pass is logged and the loop keeps going.
    pub fn start_background_task(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            if !self.config.enabled {
                info!("expired token cleanup task is disabled");
                return;
            }

            info!(
                interval_seconds = self.config.interval_seconds,
                "expired token cleanup task started"
            );
            let mut interval =
                tokio::time::interval(Duration::from_secs(self.config.interval_seconds));
            loop {
                interval.tick().await;
                if let Err(err) = self.run_once().await {
                    error!(error = %err, "expired token cleanup pass failed");
                }
            }
        })
    }
}
