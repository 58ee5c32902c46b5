//! Bcrypt implementation of the password hasher.

use bcrypt::{hash, verify};
use tracing::error;

use tb_core::errors::DomainError;
use tb_core::services::session::PasswordHasher;

/// Password hasher backed by bcrypt
pub struct BcryptHasher {
    cost: u32,
}

// bcrypt does not export its MIN_COST constant; this mirrors its value (4).
const MIN_COST: u32 = 4;

impl BcryptHasher {
    /// Create a hasher with an explicit work factor
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Create a hasher with the minimum work factor, for tests only
    pub fn fast() -> Self {
        Self { cost: MIN_COST }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        // DEFAULT_COST is 12; one verification lands around 100ms.
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plain: &str) -> Result<String, DomainError> {
        hash(plain, self.cost).map_err(|e| {
            error!(error = %e, "bcrypt hashing failed");
            DomainError::Internal {
                message: "Password hashing failed".to_string(),
            }
        })
    }

    fn verify(&self, plain: &str, hashed: &str) -> Result<bool, DomainError> {
        verify(plain, hashed).map_err(|e| {
            error!(error = %e, "bcrypt verification failed");
            DomainError::Internal {
                message: "Password verification failed".to_string(),
            }
        })
    }
}
