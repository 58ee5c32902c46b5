//! Handler for POST /api/auth/refresh

use actix_web::{web, HttpRequest, HttpResponse};

use tb_core::repositories::{CredentialStore, UserRepository};
use tb_core::services::session::PasswordHasher;
use tb_shared::{error_codes, ErrorResponse};

use crate::dto::RefreshRequest;
use crate::handlers::handle_domain_error;
use crate::state::AppState;

/// Pull the refresh token from the JSON body, falling back to the cookie
pub(super) fn presented_refresh_token<U, C, P>(
    state: &AppState<U, C, P>,
    req: &HttpRequest,
    body: &Option<web::Json<RefreshRequest>>,
) -> Option<String>
where
    U: UserRepository + 'static,
    C: CredentialStore + 'static,
    P: PasswordHasher + 'static,
{
    body.as_ref()
        .and_then(|b| b.refresh_token.clone())
        .or_else(|| {
            req.cookie(&state.auth.refresh_cookie_name)
                .map(|cookie| cookie.value().to_string())
        })
}

/// Exchange a refresh token for a new access token.
///
/// No bearer required: the refresh token itself is the credential. The
/// refresh token is not rotated, so no cookie is set here. Responds 200
/// with `{access_token, expires_in}`, or 401 for anything else.
pub async fn refresh<U, C, P>(
    state: web::Data<AppState<U, C, P>>,
    req: HttpRequest,
    body: Option<web::Json<RefreshRequest>>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    C: CredentialStore + 'static,
    P: PasswordHasher + 'static,
{
    let presented = match presented_refresh_token(&state, &req, &body) {
        Some(token) => token,
        None => {
            return HttpResponse::Unauthorized().json(ErrorResponse::new(
                error_codes::UNAUTHORIZED,
                "Refresh token missing",
            ));
        }
    };

    match state.sessions.refresh(&presented).await {
        Ok(renewed) => HttpResponse::Ok().json(renewed),
        Err(error) => handle_domain_error(error),
    }
}
