//! Handler for POST /api/admin/cleanup

use actix_web::{web, HttpResponse};
use tracing::info;

use tb_core::repositories::{CredentialStore, UserRepository};
use tb_core::services::session::PasswordHasher;

use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Trigger the expired-token sweep across all users.
///
/// The same pass the background task runs every 24 hours, on demand.
/// Responds 200 with the report; per-user failures are listed in the
/// report rather than failing the request.
pub async fn run_cleanup<U, C, P>(
    state: web::Data<AppState<U, C, P>>,
    context: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    C: CredentialStore + 'static,
    P: PasswordHasher + 'static,
{
    info!(admin_id = %context.user_id, "manual token cleanup requested");
    match state.sessions.cleanup_all_expired_tokens().await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(error) => handle_domain_error(error),
    }
}
