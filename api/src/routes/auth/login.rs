//! Handler for POST /api/auth/login

use actix_web::{web, HttpResponse};
use validator::Validate;

use tb_core::repositories::{CredentialStore, UserRepository};
use tb_core::services::session::PasswordHasher;

use crate::cookies::refresh_cookie;
use crate::dto::LoginRequest;
use crate::handlers::{handle_domain_error, handle_validation_error};
use crate::state::AppState;

/// Authenticate and open a new session.
///
/// Responds 200 with the auth payload and sets the refresh cookie;
/// 401 for bad credentials (unknown email and wrong password are
/// indistinguishable); 403 when the account is disabled.
pub async fn login<U, C, P>(
    state: web::Data<AppState<U, C, P>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    C: CredentialStore + 'static,
    P: PasswordHasher + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_error(&errors);
    }

    match state.sessions.login(&request.email, &request.password).await {
        Ok(auth) => {
            let cookie = refresh_cookie(&state.auth, state.environment, &auth.refresh_token);
            HttpResponse::Ok().cookie(cookie).json(auth)
        }
        Err(error) => handle_domain_error(error),
    }
}
