//! Authenticated HTTP plumbing for application calls.
//!
//! Wraps a [`SessionController`] so ordinary API requests pick up the
//! bearer token automatically and recover from a single stale-token 401.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::api::{self, is_public_path, AuthTransport};
use crate::error::ClientError;
use crate::session::SessionController;

/// HTTP client that attaches the session's access token to protected
/// paths and retries a rejected request once after renewing it.
pub struct AuthorizedClient<T: AuthTransport + 'static> {
    sessions: SessionController<T>,
    http: reqwest::Client,
    base_url: String,
}

impl<T: AuthTransport + 'static> AuthorizedClient<T> {
    pub fn new(
        base_url: impl Into<String>,
        sessions: SessionController<T>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(api::REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ClientError::Transport(err.to_string()))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            sessions,
            http,
            base_url,
        })
    }

    /// The session controller behind this client
    pub fn sessions(&self) -> &SessionController<T> {
        &self.sessions
    }

    /// Send a request with the current bearer token.
    ///
    /// A 401 on a protected path means the access token went stale under
    /// us; renew it and retry exactly once. A second 401 comes back to the
    /// caller untouched, and a failed renewal already ended the session.
    pub async fn request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let response = self.send_once(method.clone(), path, body).await?;
        if response.status() == StatusCode::UNAUTHORIZED && !is_public_path(path) {
            debug!(%path, "request rejected with 401, renewing token for one retry");
            self.sessions.renew_access_token().await?;
            return self.send_once(method, path, body).await;
        }
        Ok(response)
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        let response = self.request::<()>(Method::GET, path, None).await?;
        api::decode(response).await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.request(Method::POST, path, Some(body)).await?;
        api::decode(response).await
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.request(Method::PUT, path, Some(body)).await?;
        api::decode(response).await
    }

    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        let response = self.request::<()>(Method::DELETE, path, None).await?;
        api::decode(response).await
    }

    async fn send_once<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.http.request(method, self.url(path));
        if !is_public_path(path) {
            if let Some(token) = self.sessions.access_token().await {
                request = request.bearer_auth(token);
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HttpTransport;
    use crate::storage::SessionStorage;
    use uuid::Uuid;

    fn controller() -> SessionController<HttpTransport> {
        let transport = HttpTransport::new("http://localhost:8080").unwrap();
        let path =
            std::env::temp_dir().join(format!("tb-http-test-{}.json", Uuid::new_v4()));
        SessionController::new(transport, SessionStorage::new(path))
    }

    #[test]
    fn test_base_url_trailing_slashes_stripped() {
        let client = AuthorizedClient::new("http://localhost:8080///", controller()).unwrap();
        assert_eq!(client.url("/api/tasks"), "http://localhost:8080/api/tasks");
    }
}
