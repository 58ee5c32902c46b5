//! Summary of a system-wide expired-token cleanup run.

use serde::{Deserialize, Serialize};

/// Result of one batch cleanup pass over all users with stored tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    /// Number of users whose token set shrank
    pub users_affected: usize,

    /// Total number of expired tokens removed across all users
    pub tokens_removed: usize,

    /// Per-user failures skipped during the batch, as log-ready strings
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<String>,
}

impl CleanupReport {
    /// Check if the run completed without per-user failures
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fold one user's sweep outcome into the report
    pub fn record_user(&mut self, removed: usize) {
        if removed > 0 {
            self.users_affected += 1;
            self.tokens_removed += removed;
        }
    }
}
