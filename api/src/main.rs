//! TaskBoard API server binary.
//!
//! Wires the in-memory store, bcrypt hasher, token codec, and session
//! service together, spawns the background token cleanup task, and serves
//! the HTTP API built by [`tb_api::create_app`].

use std::sync::Arc;

use actix_web::{web, HttpServer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tb_api::{create_app, AppState};
use tb_core::domain::entities::user::{User, UserRole};
use tb_core::repositories::UserRepository;
use tb_core::services::session::{CleanupConfig, CleanupService, PasswordHasher, SessionService};
use tb_core::services::token::{TokenCodec, TokenConfig};
use tb_infra::{BcryptHasher, MemoryStore};
use tb_shared::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting TaskBoard API server");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Configuration error: {err}");
            std::process::exit(1);
        }
    };
    info!(environment = %config.environment, "Configuration loaded");

    let store = Arc::new(MemoryStore::new());
    let hasher = Arc::new(BcryptHasher::default());
    let codec = Arc::new(TokenCodec::new(TokenConfig::from(&config.auth)));
    let sessions = Arc::new(SessionService::new(
        store.clone(),
        store.clone(),
        hasher.clone(),
        codec.clone(),
    ));

    seed_admin(store.as_ref(), hasher.as_ref()).await;

    let cleanup = Arc::new(CleanupService::new(
        sessions.clone(),
        CleanupConfig::from(&config.cleanup),
    ));
    let cleanup_handle = cleanup.start_background_task();

    let state = web::Data::new(AppState {
        sessions,
        codec,
        auth: config.auth.clone(),
        environment: config.environment,
    });

    let bind_address = config.server.bind_address();
    info!("Server listening on {bind_address}");

    let result = HttpServer::new(move || create_app(state.clone()))
        .bind(&bind_address)?
        .run()
        .await;

    cleanup_handle.abort();
    result
}

/// Seed the bootstrap admin account from `ADMIN_EMAIL` / `ADMIN_PASSWORD`.
///
/// Does nothing when either variable is absent or the account already
/// exists. A failure is logged without stopping the server; admin access
/// can be provisioned on a later restart.
async fn seed_admin(store: &MemoryStore, hasher: &BcryptHasher) {
    let (Ok(email), Ok(password)) = (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD"))
    else {
        return;
    };

    match store.find_by_email(&email).await {
        Ok(Some(_)) => {
            info!("Admin account already exists, skipping seed");
            return;
        }
        Ok(None) => {}
        Err(err) => {
            warn!("Admin seed lookup failed: {err}");
            return;
        }
    }

    let password_hash = match hasher.hash(&password) {
        Ok(hash) => hash,
        Err(err) => {
            warn!("Admin seed could not hash the password: {err}");
            return;
        }
    };

    let admin = User::new(String::from("Administrator"), email, password_hash, UserRole::Admin);
    match store.create(admin).await {
        Ok(user) => info!(email = %user.email, "Seeded admin account"),
        Err(err) => warn!("Admin seed failed: {err}"),
    }
}
