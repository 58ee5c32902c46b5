//! Domain-specific error types and error handling.

use thiserror::Error;

/// Token codec failures.
///
/// Kept fine-grained internally for control flow and logging; the session
/// service collapses every variant into [`AuthError::InvalidToken`] before a
/// result crosses the service boundary, so callers can never distinguish a
/// forged token from an expired or mistyped one.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Signature valid but the expiry has passed
    #[error("Token has expired")]
    Expired,

    /// Malformed token or signature mismatch
    #[error("Token is invalid")]
    Invalid,

    /// A refresh token presented as an access token, or vice versa
    #[error("Token type mismatch")]
    WrongType,

    /// Signing failed; indicates key material problems, not caller input
    #[error("Token could not be created")]
    CreationFailed,
}

/// Operational authentication errors.
///
/// These are expected, caller-recoverable outcomes and map to 4xx responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are deliberately
    /// indistinguishable so the API never confirms which emails exist
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The account exists but has been deactivated
    #[error("Account has been deactivated")]
    AccountDisabled,

    /// Registration attempted with an email that is already taken
    #[error("User already exists")]
    Conflict,

    /// Bad signature, expired, wrong type, or revoked; all four collapse to
    /// one external error to avoid oracle leakage
    #[error("Invalid or expired token")]
    InvalidToken,
}

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_errors_share_one_message() {
        // Same string regardless of which half of the pair was wrong.
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }

    #[test]
    fn test_token_errors_collapse_message() {
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid or expired token");
    }

    #[test]
    fn test_domain_error_bridges_are_transparent() {
        let err: DomainError = AuthError::Conflict.into();
        assert_eq!(err.to_string(), "User already exists");

        let err: DomainError = TokenError::Expired.into();
        assert_eq!(err.to_string(), "Token has expired");
    }
}
