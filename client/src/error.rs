//! Client-side error types.

use thiserror::Error;

/// Errors surfaced by the session controller and its transport.
///
/// Variants carry plain strings rather than wrapped source errors so that
/// outcomes can be cloned across the renewal broadcast channel.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The server could not be reached or the connection failed mid-request
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Reading or writing the persisted session failed
    #[error("session storage error: {0}")]
    Storage(String),

    /// The token payload could not be decoded for expiry introspection
    #[error("token introspection failed: {0}")]
    Token(String),

    /// The session was ended, locally or by the server rejecting a renewal
    #[error("session ended")]
    SessionEnded,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::Api {
            status: 401,
            message: "Invalid or expired token".to_string(),
        };
        assert_eq!(err.to_string(), "server returned 401: Invalid or expired token");

        assert_eq!(ClientError::SessionEnded.to_string(), "session ended");
    }
}
