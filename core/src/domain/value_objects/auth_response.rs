//! Authentication response value object for API responses.

use serde::{Deserialize, Serialize};

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::UserProfile;

/// Authentication response returned after successful register/login
///
/// Contains the public user profile, the JWT pair, and the access token
/// expiration so clients can arm their renewal timers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    /// Public profile of the authenticated user
    pub user: UserProfile,

    /// JWT access token for API authentication
    pub access_token: String,

    /// JWT refresh token for obtaining new access tokens
    pub refresh_token: String,

    /// Access token expiration time in seconds
    pub expires_in: i64,
}

impl AuthResponse {
    /// Creates an authentication response from a token pair and user profile
    pub fn from_token_pair(user: UserProfile, token_pair: TokenPair) -> Self {
        Self {
            user,
            access_token: token_pair.access_token,
            refresh_token: token_pair.refresh_token,
            expires_in: token_pair.access_expires_in,
        }
    }
}

/// Response to a successful refresh call.
///
/// Only the access token is reissued; the presented refresh token stays
/// valid until it expires or is revoked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshedAccess {
    /// Newly minted JWT access token
    pub access_token: String,

    /// Access token expiration time in seconds
    pub expires_in: i64,
}
