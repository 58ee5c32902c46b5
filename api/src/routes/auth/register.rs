//! Handler for POST /api/auth/register

use actix_web::{web, HttpResponse};
use validator::Validate;

use tb_core::repositories::{CredentialStore, UserRepository};
use tb_core::services::session::PasswordHasher;

use crate::cookies::refresh_cookie;
use crate::dto::RegisterRequest;
use crate::handlers::{handle_domain_error, handle_validation_error};
use crate::state::AppState;

/// Create an account and open its first session.
///
/// Responds 201 with the auth payload and sets the refresh cookie;
/// 409 when the email is already registered; 400 on validation failure.
pub async fn register<U, C, P>(
    state: web::Data<AppState<U, C, P>>,
    request: web::Json<RegisterRequest>,
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
        .register(&request.name, &request.email, &request.password)
        .await
    {
        Ok(auth) => {
            let cookie = refresh_cookie(&state.auth, state.environment, &auth.refresh_token);
            HttpResponse::Created().cookie(cookie).json(auth)
        }
        Err(error) => handle_domain_error(error),
    }
}
