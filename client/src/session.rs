//! The client-side session controller.
//!
//! Owns the current token pair and user, persists them across restarts,
//! renews the access token ahead of expiry, and serializes concurrent
//! renewal attempts so that at most one refresh call is ever in flight.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::{broadcast, watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{AuthPayload, AuthTransport};
use crate::error::ClientError;
use crate::storage::{SessionStorage, SessionUser, StoredSession};
use crate::token;

/// How long before access-token expiry the proactive renewal fires.
///
/// Also the rehydration threshold: a stored token already inside this
/// window is renewed immediately instead of being trusted as ready.
pub const RENEWAL_LOOKAHEAD_SECONDS: i64 = 120;

/// What the application should currently show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// No usable session; show the login view
    Unauthenticated,
    /// A session is live for this user
    Authenticated(SessionUser),
}

/// Outcome published to every waiter of a single-flight renewal
#[derive(Debug, Clone)]
enum RenewalOutcome {
    Renewed(String),
    Failed,
}

struct Inner<T> {
    transport: T,
    storage: SessionStorage,
    state: RwLock<Option<StoredSession>>,
    /// Single-flight slot: `Some` while a renewal is in flight. The owner
    /// installs a sender, performs the network call, then takes the slot
    /// back and publishes; joiners subscribe and wait.
    renewal: Mutex<Option<broadcast::Sender<RenewalOutcome>>>,
    /// The one outstanding proactive renewal timer, if armed
    timer: Mutex<Option<JoinHandle<()>>>,
    status_tx: watch::Sender<SessionStatus>,
}

/// Client session controller. Cheap to clone; clones share all state.
pub struct SessionController<T: AuthTransport> {
    inner: Arc<Inner<T>>,
}

impl<T: AuthTransport> Clone for SessionController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: AuthTransport + 'static> SessionController<T> {
    /// Create a controller over a transport and a session store
    pub fn new(transport: T, storage: SessionStorage) -> Self {
        let (status_tx, _) = watch::channel(SessionStatus::Unauthenticated);
        Self {
            inner: Arc::new(Inner {
                transport,
                storage,
                state: RwLock::new(None),
                renewal: Mutex::new(None),
                timer: Mutex::new(None),
                status_tx,
            }),
        }
    }

    /// Watch the session status; the receiver starts on the current value
    pub fn subscribe_status(&self) -> watch::Receiver<SessionStatus> {
        self.inner.status_tx.subscribe()
    }

    /// The signed-in user, if any
    pub async fn current_user(&self) -> Option<SessionUser> {
        self.inner.state.read().await.as_ref().map(|s| s.user.clone())
    }

    /// The current access token, if a session is live
    pub async fn access_token(&self) -> Option<String> {
        self.inner
            .state
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Rehydrate the session from storage.
    ///
    /// A stored access token already inside the renewal lookahead (or past
    /// expiry) is renewed before the session is reported usable; if that
    /// renewal fails the stored session is discarded. Returns whether a
    /// live session resulted.
    pub async fn restore(&self) -> bool {
        let Some(session) = self.inner.storage.load().await else {
            return false;
        };

        let near_expiry = token::expires_within(
            &session.access_token,
            Duration::seconds(RENEWAL_LOOKAHEAD_SECONDS),
        );
        let user = session.user.clone();
        let access_token = session.access_token.clone();
        *self.inner.state.write().await = Some(session);

        if near_expiry {
            info!("stored access token is near expiry, renewing before use");
            match self.renew_access_token().await {
                Ok(_) => true,
                Err(err) => {
                    warn!(error = %err, "could not renew restored session");
                    false
                }
            }
        } else {
            self.inner
                .status_tx
                .send_replace(SessionStatus::Authenticated(user));
            self.arm_renewal_timer(&access_token).await;
            true
        }
    }

    /// Create an account and open its first session
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, ClientError> {
        let payload = self.inner.transport.register(name, email, password).await?;
        self.install_session(payload).await
    }

    /// Open a session with existing credentials
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ClientError> {
        let payload = self.inner.transport.login(email, password).await?;
        self.install_session(payload).await
    }

    /// End the current session.
    ///
    /// Local state is cleared even when the server call fails; the client
    /// side of a logout must not depend on server reachability.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let session = self.inner.state.read().await.clone();
        if let Some(session) = session {
            if let Err(err) = self
                .inner
                .transport
                .logout(&session.access_token, &session.refresh_token)
                .await
            {
                warn!(error = %err, "logout request failed, clearing local session anyway");
            }
        }
        self.end_session().await;
        Ok(())
    }

    /// End every session for this user, on all devices
    pub async fn logout_all(&self) -> Result<(), ClientError> {
        let session = self.inner.state.read().await.clone();
        if let Some(session) = session {
            if let Err(err) = self.inner.transport.logout_all(&session.access_token).await {
                warn!(error = %err, "logout-all request failed, clearing local session anyway");
            }
        }
        self.end_session().await;
        Ok(())
    }

    /// Renew the access token, joining an in-flight renewal if one exists.
    ///
    /// Exactly one network refresh runs no matter how many callers arrive
    /// concurrently; every caller resolves with the same fresh token. A
    /// failed renewal is a hard session end, never retried here.
    pub async fn renew_access_token(&self) -> Result<String, ClientError> {
        let joined = {
            let mut slot = self.inner.renewal.lock().await;
            match slot.as_ref() {
                Some(sender) => Some(sender.subscribe()),
                None => {
                    let (tx, _) = broadcast::channel(8);
                    *slot = Some(tx);
                    None
                }
            }
        };

        if let Some(mut receiver) = joined {
            debug!("renewal already in flight, waiting for its outcome");
            return match receiver.recv().await {
                Ok(RenewalOutcome::Renewed(access_token)) => Ok(access_token),
                Ok(RenewalOutcome::Failed) | Err(_) => Err(ClientError::SessionEnded),
            };
        }

        // This caller owns the renewal.
        let outcome = self.perform_renewal().await;
        let sender = self.inner.renewal.lock().await.take();

        match outcome {
            Ok(access_token) => {
                if let Some(sender) = sender {
                    let _ = sender.send(RenewalOutcome::Renewed(access_token.clone()));
                }
                Ok(access_token)
            }
            Err(err) => {
                if let Some(sender) = sender {
                    let _ = sender.send(RenewalOutcome::Failed);
                }
                Err(err)
            }
        }
    }

    /// One network renewal attempt. Failure ends the session.
    async fn perform_renewal(&self) -> Result<String, ClientError> {
        let refresh_token = {
            let state = self.inner.state.read().await;
            match state.as_ref() {
                Some(session) => session.refresh_token.clone(),
                None => return Err(ClientError::SessionEnded),
            }
        };

        match self.inner.transport.refresh(&refresh_token).await {
            Ok(renewed) => {
                self.apply_renewed_token(renewed.access_token.clone()).await?;
                debug!("access token renewed");
                Ok(renewed.access_token)
            }
            Err(err) => {
                warn!(error = %err, "token renewal failed, ending session");
                self.end_session().await;
                Err(ClientError::SessionEnded)
            }
        }
    }

    async fn install_session(&self, payload: AuthPayload) -> Result<SessionUser, ClientError> {
        let session = StoredSession {
            user: payload.user,
            access_token: payload.access_token,
            refresh_token: payload.refresh_token,
        };

        self.inner.storage.save(&session).await?;
        *self.inner.state.write().await = Some(session.clone());
        self.inner
            .status_tx
            .send_replace(SessionStatus::Authenticated(session.user.clone()));
        self.arm_renewal_timer(&session.access_token).await;

        info!(email = %session.user.email, "session opened");
        Ok(session.user)
    }

    async fn apply_renewed_token(&self, access_token: String) -> Result<(), ClientError> {
        let updated = {
            let mut state = self.inner.state.write().await;
            match state.as_mut() {
                Some(session) => {
                    session.access_token = access_token;
                    session.clone()
                }
                // Logged out while the renewal was in flight.
                None => return Err(ClientError::SessionEnded),
            }
        };

        if let Err(err) = self.inner.storage.save(&updated).await {
            warn!(error = %err, "could not persist renewed session");
        }
        self.inner
            .status_tx
            .send_replace(SessionStatus::Authenticated(updated.user.clone()));
        self.arm_renewal_timer(&updated.access_token).await;
        Ok(())
    }

    /// Arm the proactive renewal timer for `expiry - lookahead`.
    ///
    /// Always cancels the previously armed timer first; there is never
    /// more than one outstanding.
    ///
    /// Returns a boxed future: the timer task awaits `renew_access_token`,
    /// which awaits this method again, and the type erasure breaks the
    /// resulting `Send` inference cycle on the recursive opaque future.
    fn arm_renewal_timer<'a>(
        &'a self,
        access_token: &'a str,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            let delay = match token::expiry_of(access_token) {
                Ok(expiry) => {
                    let fire_at = expiry - Duration::seconds(RENEWAL_LOOKAHEAD_SECONDS);
                    (fire_at - Utc::now())
                        .to_std()
                        .unwrap_or(std::time::Duration::ZERO)
                }
                Err(err) => {
                    warn!(error = %err, "cannot schedule renewal for an undecodable token");
                    return;
                }
            };

            let mut slot = self.inner.timer.lock().await;
            if let Some(previous) = slot.take() {
                previous.abort();
            }

            let controller = self.clone();
            *slot = Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                // Drop this handle from the slot first, so re-arming after the
                // renewal does not abort the very task performing it.
                controller.inner.timer.lock().await.take();
                debug!("proactive renewal timer fired");
                let _ = controller.renew_access_token().await;
            }));
        })
    }

    async fn cancel_timer(&self) {
        if let Some(handle) = self.inner.timer.lock().await.take() {
            handle.abort();
        }
    }

    /// Hard session end: cancel the timer, clear memory and storage, and
    /// tell the application to show the unauthenticated view.
    async fn end_session(&self) {
        self.cancel_timer().await;
        *self.inner.state.write().await = None;
        if let Err(err) = self.inner.storage.clear().await {
            warn!(error = %err, "could not clear stored session");
        }
        self.inner
            .status_tx
            .send_replace(SessionStatus::Unauthenticated);
    }
}
