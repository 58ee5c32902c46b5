//! Password hashing seam.
//!
//! The domain layer never sees plaintext beyond these two calls and never
//! picks the algorithm; the infrastructure crate provides the bcrypt
//! implementation.

use crate::errors::DomainError;

/// One-way, salted password hashing primitive
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage
    fn hash(&self, plain: &str) -> Result<String, DomainError>;

    /// Check a plaintext password against a stored hash
    fn verify(&self, plain: &str, hash: &str) -> Result<bool, DomainError>;
}
