//! Role gate for administrative endpoints.
//!
//! Must sit inside [`JwtAuth`](super::auth::JwtAuth): it reads the
//! `AuthContext` that JwtAuth injected and answers 403 for any caller
//! whose token does not carry the admin role.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::InternalError;
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use tb_shared::{error_codes, ErrorResponse};

use super::auth::{unauthorized, AuthContext};

fn forbidden(message: &str) -> Error {
    let response =
        HttpResponse::Forbidden().json(ErrorResponse::new(error_codes::FORBIDDEN, message));
    InternalError::from_response(message.to_string(), response).into()
}

/// Middleware factory rejecting non-admin callers
pub struct RequireAdmin;

impl<S, B> Transform<S, ServiceRequest> for RequireAdmin
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAdminMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAdminMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Role gate middleware service
pub struct RequireAdminMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireAdminMiddleware<S>
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

        Box::pin(async move {
            let caller = {
                let extensions = req.extensions();
                extensions.get::<AuthContext>().cloned()
            };

            match caller {
                Some(context) if context.is_admin() => service.call(req).await,
                Some(context) => {
                    warn!(user_id = %context.user_id, "non-admin call to admin endpoint");
                    Err(forbidden("Administrator access required"))
                }
                None => Err(unauthorized("Authentication required")),
            }
        })
    }
}
