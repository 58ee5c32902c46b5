//! Application factory.
//!
//! Builds the fully-wired actix `App` from an [`AppState`]; production
//! `main` and the integration tests share this factory so they exercise
//! the same middleware stack and routes.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, Error, HttpResponse};
use tracing_actix_web::TracingLogger;

use tb_core::repositories::{CredentialStore, UserRepository};
use tb_core::services::session::PasswordHasher;
use tb_shared::{error_codes, ErrorResponse};

use crate::middleware::{create_cors, JwtAuth, RequireAdmin};
use crate::routes::admin::{run_cleanup, update_user_status};
use crate::routes::auth::{change_password, login, logout, logout_all, me, refresh, register};
use crate::state::AppState;

/// Create and configure the application with all routes and middleware
pub fn create_app<U, C, P>(
    state: web::Data<AppState<U, C, P>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    C: CredentialStore + 'static,
    P: PasswordHasher + 'static,
{
    let codec = state.codec.clone();
    let cors = create_cors(state.environment);

    App::new()
        .app_data(state)
        .wrap(TracingLogger::default())
        .wrap(cors)
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(register::<U, C, P>))
                        .route("/login", web::post().to(login::<U, C, P>))
                        .route("/refresh", web::post().to(refresh::<U, C, P>))
                        .route(
                            "/logout",
                            web::post()
                                .to(logout::<U, C, P>)
                                .wrap(JwtAuth::new(codec.clone())),
                        )
                        .route(
                            "/logout-all",
                            web::post()
                                .to(logout_all::<U, C, P>)
                                .wrap(JwtAuth::new(codec.clone())),
                        )
                        .route(
                            "/change-password",
                            web::post()
                                .to(change_password::<U, C, P>)
                                .wrap(JwtAuth::new(codec.clone())),
                        )
                        .route(
                            "/me",
                            web::get().to(me::<U, C, P>).wrap(JwtAuth::new(codec.clone())),
                        ),
                )
                .service(
                    web::scope("/admin")
                        .wrap(RequireAdmin)
                        .wrap(JwtAuth::new(codec))
                        .route("/cleanup", web::post().to(run_cleanup::<U, C, P>))
                        .route("/users/{id}/status", web::put().to(update_user_status::<U, C, P>)),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "taskboard-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
