//! JWT authentication middleware for protecting API endpoints.
//!
//! Extracts the bearer token from the Authorization header, verifies it
//! with the shared token codec, and injects an [`AuthContext`] into the
//! request extensions. A refresh token presented as a bearer is rejected
//! by the codec's type guard like any other invalid token.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::InternalError;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;
use tracing::warn;
use uuid::Uuid;

use tb_core::domain::entities::token::AccessClaims;
use tb_core::domain::entities::user::UserRole;
use tb_core::services::token::TokenCodec;
use tb_shared::{error_codes, ErrorResponse};

/// Authenticated caller identity injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Subject id from the access token
    pub user_id: Uuid,
    /// Email claim
    pub email: String,
    /// Role claim, checked by the admin middleware
    pub role: UserRole,
}

impl AuthContext {
    fn from_claims(claims: AccessClaims) -> Self {
        Self {
            user_id: claims.id,
            email: claims.email,
            role: claims.role,
        }
    }

    /// Whether the caller holds admin privileges
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Build a 401 rejection carrying the standard error envelope
pub(crate) fn unauthorized(message: &str) -> Error {
    let response = HttpResponse::Unauthorized()
        .json(ErrorResponse::new(error_codes::UNAUTHORIZED, message));
    InternalError::from_response(message.to_string(), response).into()
}

/// JWT authentication middleware factory
pub struct JwtAuth {
    codec: Arc<TokenCodec>,
}

impl JwtAuth {
    /// Create the middleware around a shared token codec
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            codec: self.codec.clone(),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    codec: Arc<TokenCodec>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let codec = self.codec.clone();

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    return Err(unauthorized("Missing or invalid Authorization header"));
                }
            };

            match codec.verify_access(&token) {
                Ok(claims) => {
                    req.extensions_mut().insert(AuthContext::from_claims(claims));
                }
                Err(err) => {
                    warn!(error = %err, "access token rejected");
                    return Err(unauthorized("Invalid or expired token"));
                }
            }

            service.call(req).await
        })
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| unauthorized("Authentication required"));

        ready(result)
    }
}
