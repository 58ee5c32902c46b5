//! Handlers for POST /api/auth/logout and /api/auth/logout-all

use actix_web::{web, HttpRequest, HttpResponse};

use tb_core::repositories::{CredentialStore, UserRepository};
use tb_core::services::session::PasswordHasher;

use crate::cookies::clear_refresh_cookie;
use crate::dto::{MessageResponse, RefreshRequest};
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::state::AppState;

use super::refresh::presented_refresh_token;

/// End the calling device's session.
///
/// Removes the presented refresh token from the caller's stored set and
/// clears the cookie. Idempotent: an already-removed or absent token
/// still answers 200.
pub async fn logout<U, C, P>(
    state: web::Data<AppState<U, C, P>>,
    context: AuthContext,
    req: HttpRequest,
    body: Option<web::Json<RefreshRequest>>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    C: CredentialStore + 'static,
    P: PasswordHasher + 'static,
{
    if let Some(token) = presented_refresh_token(&state, &req, &body) {
        if let Err(error) = state.sessions.logout(context.user_id, &token).await {
            return handle_domain_error(error);
        }
    }

    HttpResponse::Ok()
        .cookie(clear_refresh_cookie(&state.auth, state.environment))
        .json(MessageResponse::new("Logged out successfully"))
}

/// End every session the caller holds, on all devices
pub async fn logout_all<U, C, P>(
    state: web::Data<AppState<U, C, P>>,
    context: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    C: CredentialStore + 'static,
    P: PasswordHasher + 'static,
{
    match state.sessions.logout_all(context.user_id).await {
        Ok(()) => HttpResponse::Ok()
            .cookie(clear_refresh_cookie(&state.auth, state.environment))
            .json(MessageResponse::new("Logged out from all devices")),
        Err(error) => handle_domain_error(error),
    }
}
