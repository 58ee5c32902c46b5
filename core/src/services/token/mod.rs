//! Token issuance and verification.

pub mod codec;
pub mod config;

pub use codec::TokenCodec;
pub use config::TokenConfig;
