//! Handler for POST /api/auth/change-password

use actix_web::{web, HttpResponse};
use validator::Validate;

use tb_core::repositories::{CredentialStore, UserRepository};
use tb_core::services::session::PasswordHasher;

use crate::cookies::clear_refresh_cookie;
use crate::dto::{ChangePasswordRequest, MessageResponse};
use crate::handlers::{handle_domain_error, handle_validation_error};
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Change the caller's password.
///
/// Requires the current password. Every session ends, including this
/// one: the stored token set is cleared and the cookie removed, so all
/// devices must log in again with the new password.
pub async fn change_password<U, C, P>(
    state: web::Data<AppState<U, C, P>>,
    context: AuthContext,
    request: web::Json<ChangePasswordRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    C: CredentialStore + 'static,
    P: PasswordHasher + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_error(&errors);
    }

    match state
        .sessions
        .change_password(
            context.user_id,
            &request.current_password,
            &request.new_password,
        )
        .await
    {
        Ok(()) => HttpResponse::Ok()
            .cookie(clear_refresh_cookie(&state.auth, state.environment))
            .json(MessageResponse::new("Password changed successfully")),
        Err(error) => handle_domain_error(error),
    }
}
