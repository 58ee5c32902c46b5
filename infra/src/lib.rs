//! # Infrastructure Layer
//!
//! Concrete implementations of the persistence and hashing interfaces that
//! the core crate defines as traits.
//!
//! The infrastructure layer contains:
//! - **Persistence**: an in-process store backing both the user repository
//!   and the credential store
//! - **Auth**: bcrypt password hashing

/// Password hashing implementations
pub mod auth;

/// Storage adapters for users and their refresh tokens
pub mod persistence;

pub use auth::BcryptHasher;
pub use persistence::MemoryStore;
