//! # TaskBoard Client Session
//!
//! Client-side session handling for the TaskBoard API: durable token
//! custody, proactive access-token renewal ahead of expiry, single-flight
//! refresh under concurrent demand, and an HTTP wrapper that attaches the
//! bearer token and retries once after a 401.

pub mod api;
pub mod error;
pub mod http;
pub mod session;
pub mod storage;
pub mod token;

pub use api::{AuthTransport, HttpTransport};
pub use error::ClientError;
pub use http::AuthorizedClient;
pub use session::{SessionController, SessionStatus};
pub use storage::{SessionStorage, SessionUser, StoredSession};
