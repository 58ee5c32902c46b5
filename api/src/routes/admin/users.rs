//! Handler for PUT /api/admin/users/{id}/status

use actix_web::{web, HttpResponse};
use tracing::info;
use uuid::Uuid;

use tb_core::repositories::{CredentialStore, UserRepository};
use tb_core::services::session::PasswordHasher;

use crate::dto::UpdateStatusRequest;
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Enable or disable an account.
///
/// Deactivation clears the target's refresh tokens, so their sessions
/// end immediately rather than at next token expiry. Responds 200 with
/// the updated profile, or 404 for an unknown user.
pub async fn update_user_status<U, C, P>(
    state: web::Data<AppState<U, C, P>>,
    context: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<UpdateStatusRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    C: CredentialStore + 'static,
    P: PasswordHasher + 'static,
{
    let user_id = path.into_inner();
    info!(
        admin_id = %context.user_id,
        user_id = %user_id,
        active = request.active,
        "account status change requested"
    );

    match state
        .sessions
        .set_account_active(user_id, request.active)
        .await
    {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(error) => handle_domain_error(error),
    }
}
