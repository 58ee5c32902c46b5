//! Mapping from domain errors to HTTP responses.
//!
//! Every error leaves the API as the same JSON envelope
//! `{error, message, timestamp}`. Token and credential failures share one
//! 401 shape, so a caller cannot distinguish a revoked token from an
//! expired one, or an unknown email from a wrong password.

use actix_web::HttpResponse;
use tracing::{error, warn};
use validator::ValidationErrors;

use tb_core::errors::{AuthError, DomainError};
use tb_shared::{error_codes, ErrorResponse};

/// Convert a domain error into its HTTP response
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match &error {
        DomainError::Auth(auth_error) => match auth_error {
            AuthError::InvalidCredentials | AuthError::InvalidToken => {
                warn!(error = %auth_error, "authentication rejected");
                HttpResponse::Unauthorized().json(ErrorResponse::new(
                    error_codes::UNAUTHORIZED,
                    auth_error.to_string(),
                ))
            }
            AuthError::AccountDisabled => HttpResponse::Forbidden().json(ErrorResponse::new(
                error_codes::ACCOUNT_DISABLED,
                auth_error.to_string(),
            )),
            AuthError::Conflict => HttpResponse::Conflict().json(ErrorResponse::new(
                error_codes::CONFLICT,
                auth_error.to_string(),
            )),
        },
        // Raw codec errors normally collapse inside the session service;
        // any that escape still answer as one opaque 401.
        DomainError::Token(token_error) => {
            warn!(error = %token_error, "token verification failed");
            HttpResponse::Unauthorized().json(ErrorResponse::new(
                error_codes::UNAUTHORIZED,
                AuthError::InvalidToken.to_string(),
            ))
        }
        DomainError::Validation { message } => HttpResponse::BadRequest()
            .json(ErrorResponse::new(error_codes::VALIDATION_ERROR, message)),
        DomainError::NotFound { resource } => HttpResponse::NotFound().json(ErrorResponse::new(
            error_codes::NOT_FOUND,
            format!("{resource} not found"),
        )),
        DomainError::Internal { message } => {
            error!(error = %message, "internal error");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                error_codes::INTERNAL_ERROR,
                "An internal error occurred",
            ))
        }
    }
}

/// Convert request body validation failures into a 400 response
pub fn handle_validation_error(errors: &ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(
        error_codes::VALIDATION_ERROR,
        errors.to_string(),
    ))
}
