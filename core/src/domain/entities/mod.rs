//! Domain entities representing core business objects.

pub mod token;
pub mod user;

// Re-export commonly used types
pub use token::{
    AccessClaims, RefreshClaims, TokenPair, ACCESS_TOKEN_EXPIRY_MINUTES,
    REFRESH_TOKEN_EXPIRY_DAYS, REFRESH_TOKEN_TYPE,
};
pub use user::{User, UserProfile, UserRole};
