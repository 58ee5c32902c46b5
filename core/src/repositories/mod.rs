//! Repository interfaces for data persistence.
//!
//! Traits only; concrete adapters live in the infrastructure crate. Each
//! trait ships with a `#[cfg(test)]` mock used by service-level tests.

pub mod credentials;
pub mod user;

pub use credentials::CredentialStore;
pub use user::UserRepository;

#[cfg(test)]
pub use user::MockUserStore;
