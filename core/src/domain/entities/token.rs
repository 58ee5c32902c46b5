//! Token claim structures for JWT-based authentication.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserRole;

/// Access token expiration time (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Refresh token expiration time (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Value of the `type` claim that marks a refresh token
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Claims carried by an access token.
///
/// Access tokens are never persisted server-side; signature, expiry, and the
/// absence of the refresh `type` marker are the whole validity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject user ID
    pub id: Uuid,

    /// Subject email address
    pub email: String,

    /// Subject role at issue time
    pub role: UserRole,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Token type discriminator.
    ///
    /// Never set on access tokens; deserialized when present so the
    /// validator can reject a refresh token smuggled into an access slot.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl AccessClaims {
    /// Creates claims for a new access token valid for `ttl`
    pub fn new(user_id: Uuid, email: String, role: UserRole, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: user_id,
            email,
            role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            token_type: None,
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Checks if the payload is marked as a refresh token
    pub fn is_refresh_typed(&self) -> bool {
        self.token_type.as_deref() == Some(REFRESH_TOKEN_TYPE)
    }
}

/// Claims carried by a refresh token.
///
/// The `type` marker keeps a refresh token from ever being accepted where an
/// access token is expected, even if both secrets were misconfigured to the
/// same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject user ID
    pub id: Uuid,

    /// Token type discriminator, always `"refresh"`
    #[serde(rename = "type")]
    pub token_type: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

impl RefreshClaims {
    /// Creates claims for a new refresh token valid for `ttl`
    pub fn new(user_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: user_id,
            token_type: REFRESH_TOKEN_TYPE.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Checks the `type` marker
    pub fn is_refresh(&self) -> bool {
        self.token_type == REFRESH_TOKEN_TYPE
    }
}

/// Token pair returned to the client after register/login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token expiry time in seconds
    pub access_expires_in: i64,

    /// Refresh token expiry time in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair with its expiry windows in seconds
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = AccessClaims::new(
            user_id,
            "alice@example.com".to_string(),
            UserRole::User,
            Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES),
        );

        assert_eq!(claims.id, user_id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.token_type, None);
        assert!(!claims.is_expired());
        assert!(!claims.is_refresh_typed());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = RefreshClaims::new(user_id, Duration::days(REFRESH_TOKEN_EXPIRY_DAYS));

        assert_eq!(claims.id, user_id);
        assert!(claims.is_refresh());
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_access_claims_expiration() {
        let mut claims = AccessClaims::new(
            Uuid::new_v4(),
            "a@b.com".to_string(),
            UserRole::User,
            Duration::minutes(15),
        );
        claims.exp = Utc::now().timestamp() - 1;

        assert!(claims.is_expired());
    }

    #[test]
    fn test_type_marker_serialized_as_type() {
        let claims = RefreshClaims::new(Uuid::new_v4(), Duration::days(7));
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["type"], "refresh");
    }

    #[test]
    fn test_access_claims_omit_type_field() {
        let claims = AccessClaims::new(
            Uuid::new_v4(),
            "a@b.com".to_string(),
            UserRole::Admin,
            Duration::minutes(15),
        );
        let json = serde_json::to_value(&claims).unwrap();

        assert!(json.get("type").is_none());
        assert_eq!(json["role"], "admin");
    }

    #[test]
    fn test_access_claims_detect_smuggled_refresh_type() {
        // A refresh payload decoded through the access claims shape must be
        // recognizable by its marker.
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "email": "a@b.com",
            "role": "user",
            "iat": Utc::now().timestamp(),
            "exp": Utc::now().timestamp() + 900,
            "type": "refresh",
        });
        let claims: AccessClaims = serde_json::from_value(json).unwrap();

        assert!(claims.is_refresh_typed());
    }

    #[test]
    fn test_token_pair_serialization() {
        let pair = TokenPair::new(
            "access.jwt".to_string(),
            "refresh.jwt".to_string(),
            900,
            604_800,
        );

        let json = serde_json::to_string(&pair).unwrap();
        let deserialized: TokenPair = serde_json::from_str(&json).unwrap();

        assert_eq!(pair, deserialized);
        assert_eq!(deserialized.access_expires_in, 900);
    }
}
