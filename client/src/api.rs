//! Transport seam and the reqwest-backed implementation.
//!
//! The session controller talks to the server only through
//! [`AuthTransport`], which keeps the renewal logic testable with a mock.
//! [`HttpTransport`] is the production implementation over `reqwest`.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ClientError;
use crate::storage::SessionUser;

/// Request timeout for every call to the API
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Paths that are served without a bearer token.
///
/// The authorized wrapper must skip attaching a stale or absent token for
/// exactly these, and a 401 from one of them never triggers a renewal.
pub static PUBLIC_PATHS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["/api/auth/register", "/api/auth/login", "/api/auth/refresh", "/health"]
        .into_iter()
        .collect()
});

/// Whether a request path is served without authentication
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(path)
}

/// Successful register/login payload
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    /// The signed-in user
    pub user: SessionUser,
    /// Fresh access token
    pub access_token: String,
    /// Fresh refresh token
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Successful refresh payload; only the access token is reissued
#[derive(Debug, Clone, Deserialize)]
pub struct RenewedAccess {
    /// Fresh access token
    pub access_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[allow(dead_code)]
    error: String,
    message: String,
}

/// The authentication calls the session controller needs from the server
#[async_trait]
pub trait AuthTransport: Send + Sync {
    /// Create an account and open its first session
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthPayload, ClientError>;

    /// Open a session with existing credentials
    async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ClientError>;

    /// Exchange the refresh token for a new access token
    async fn refresh(&self, refresh_token: &str) -> Result<RenewedAccess, ClientError>;

    /// End one session server-side
    async fn logout(&self, access_token: &str, refresh_token: &str) -> Result<(), ClientError>;

    /// End every session server-side
    async fn logout_all(&self, access_token: &str) -> Result<(), ClientError>;
}

/// reqwest-backed transport against a TaskBoard API base URL
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport for the given base URL, e.g. `http://localhost:8080`
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ClientError::Transport(err.to_string()))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { base_url, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Decode a JSON success body, or map a non-2xx response to `Api`
pub(crate) async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| ClientError::Transport(err.to_string()))
    } else {
        Err(api_error(response).await)
    }
}

/// Discard the body of a success response, or map the failure
async fn ensure_success(response: reqwest::Response) -> Result<(), ClientError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(api_error(response).await)
    }
}

async fn api_error(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let message = match response.json::<ApiErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl AuthTransport for HttpTransport {
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthPayload, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            }))
            .send()
            .await?;
        decode(response).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;
        decode(response).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RenewedAccess, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/refresh"))
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;
        decode(response).await
    }

    async fn logout(&self, access_token: &str, refresh_token: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/logout"))
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;
        ensure_success(response).await
    }

    async fn logout_all(&self, access_token: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/logout-all"))
            .bearer_auth(access_token)
            .send()
            .await?;
        ensure_success(response).await
    }
}
