//! CORS configuration for browser clients.
//!
//! Development is fully permissive so local frontends on any port can talk
//! to the API with credentials. Production only admits the origins listed
//! in `ALLOWED_ORIGINS`; the refresh cookie requires credentialed
//! requests, so wildcards are off the table there.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use tracing::info;

use tb_shared::Environment;

/// Creates a CORS middleware instance configured for the given environment
pub fn create_cors(environment: Environment) -> Cors {
    if environment.is_production() {
        create_production_cors()
    } else {
        info!("permissive CORS enabled for development");
        Cors::permissive()
    }
}

fn create_production_cors() -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600);

    if let Ok(allowed_origins) = std::env::var("ALLOWED_ORIGINS") {
        for origin in allowed_origins.split(',').map(|s| s.trim()) {
            if !origin.is_empty() {
                info!(origin, "allowing CORS origin");
                cors = cors.allowed_origin(origin);
            }
        }
    }

    cors
}
