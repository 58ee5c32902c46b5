//! Handler for GET /api/auth/me

use actix_web::{web, HttpResponse};

use tb_core::repositories::{CredentialStore, UserRepository};
use tb_core::services::session::PasswordHasher;

use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Return the authenticated caller's public profile
pub async fn me<U, C, P>(
    state: web::Data<AppState<U, C, P>>,
    context: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    C: CredentialStore + 'static,
    P: PasswordHasher + 'static,
{
    match state.sessions.me(context.user_id).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(error) => handle_domain_error(error),
    }
}
