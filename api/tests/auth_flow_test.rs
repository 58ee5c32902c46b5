//! Integration tests for the public authentication routes.
//!
//! Exercises register, login, and refresh through the full app factory,
//! including the refresh cookie contract.

use std::sync::Arc;

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{test, web};

use tb_api::{create_app, AppState};
use tb_core::services::session::SessionService;
use tb_core::services::token::{TokenCodec, TokenConfig};
use tb_infra::{BcryptHasher, MemoryStore};
use tb_shared::{AuthConfig, Environment};

fn test_state() -> web::Data<AppState<MemoryStore, MemoryStore, BcryptHasher>> {
    let auth = AuthConfig::default();
    let store = Arc::new(MemoryStore::new());
    let hasher = Arc::new(BcryptHasher::fast());
    let codec = Arc::new(TokenCodec::new(TokenConfig::from(&auth)));
    let sessions = Arc::new(SessionService::new(
        store.clone(),
        store,
        hasher,
        codec.clone(),
    ));

    web::Data::new(AppState {
        sessions,
        codec,
        auth,
        environment: Environment::Development,
    })
}

fn register_request(name: &str, email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(serde_json::json!({
            "name": name,
            "email": email,
            "password": password,
        }))
}

fn login_request(email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({
            "email": email,
            "password": password,
        }))
}

#[actix_web::test]
async fn test_health_check() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "taskboard-api");
}

#[actix_web::test]
async fn test_register_refresh_logout_cycle() {
    let app = test::init_service(create_app(test_state())).await;

    // Register and check the session cookie attributes.
    let resp = test::call_service(
        &app,
        register_request("Alice", "alice@example.com", "correct-horse-1").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    {
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == "refresh_token")
            .expect("register must set the refresh cookie");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        // Development environment, so the cookie is not marked Secure.
        assert_ne!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(CookieDuration::days(7)));
    }

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["expires_in"], 900);
    let access_token = body["access_token"].as_str().unwrap().to_string();
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    // The refresh cookie alone is enough to renew the access token.
    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .cookie(Cookie::new("refresh_token", refresh_token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let renewed: serde_json::Value = test::read_body_json(resp).await;
    assert!(!renewed["access_token"].as_str().unwrap().is_empty());
    assert_eq!(renewed["expires_in"], 900);

    // Logout revokes the stored token and clears the cookie.
    let req = test::TestRequest::post()
        .uri("/api/auth/logout")
        .insert_header((header::AUTHORIZATION, format!("Bearer {access_token}")))
        .cookie(Cookie::new("refresh_token", refresh_token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    {
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == "refresh_token")
            .expect("logout must clear the refresh cookie");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Logged out successfully");

    // The revoked refresh token no longer renews anything.
    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .cookie(Cookie::new("refresh_token", refresh_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert_eq!(body["message"], "Invalid or expired token");
}

#[actix_web::test]
async fn test_login_returns_fresh_pair() {
    let app = test::init_service(create_app(test_state())).await;

    let resp = test::call_service(
        &app,
        register_request("Alice", "alice@example.com", "correct-horse-1").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let resp = test::call_service(
        &app,
        login_request("alice@example.com", "correct-horse-1").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert!(!body["refresh_token"].as_str().unwrap().is_empty());
    assert!(body["user"]["last_login_at"].is_string());
}

#[actix_web::test]
async fn test_register_duplicate_email_conflict() {
    let app = test::init_service(create_app(test_state())).await;

    let resp = test::call_service(
        &app,
        register_request("Alice", "alice@example.com", "correct-horse-1").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    // Same address in a different case is still a conflict.
    let resp = test::call_service(
        &app,
        register_request("Impostor", "Alice@Example.com", "other-password-1").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 409);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "CONFLICT");
    assert_eq!(body["message"], "User already exists");
}

#[actix_web::test]
async fn test_register_validation_rejected() {
    let app = test::init_service(create_app(test_state())).await;

    let resp = test::call_service(
        &app,
        register_request("Alice", "not-an-email", "correct-horse-1").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let resp = test::call_service(
        &app,
        register_request("Alice", "alice@example.com", "short").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_login_failures_are_indistinguishable() {
    let app = test::init_service(create_app(test_state())).await;

    test::call_service(
        &app,
        register_request("Alice", "alice@example.com", "correct-horse-1").to_request(),
    )
    .await;

    let wrong_password = test::call_service(
        &app,
        login_request("alice@example.com", "wrong-password-1").to_request(),
    )
    .await;
    assert_eq!(wrong_password.status(), 401);
    let wrong_password: serde_json::Value = test::read_body_json(wrong_password).await;

    let unknown_email = test::call_service(
        &app,
        login_request("nobody@example.com", "wrong-password-1").to_request(),
    )
    .await;
    assert_eq!(unknown_email.status(), 401);
    let unknown_email: serde_json::Value = test::read_body_json(unknown_email).await;

    // Neither response may reveal whether the account exists.
    assert_eq!(wrong_password["message"], "Invalid email or password");
    assert_eq!(wrong_password["message"], unknown_email["message"]);
    assert_eq!(wrong_password["error"], unknown_email["error"]);
}

#[actix_web::test]
async fn test_refresh_without_token_rejected() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::post().uri("/api/auth/refresh").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert_eq!(body["message"], "Refresh token missing");
}

#[actix_web::test]
async fn test_refresh_accepts_token_in_body() {
    let app = test::init_service(create_app(test_state())).await;

    let resp = test::call_service(
        &app,
        register_request("Alice", "alice@example.com", "correct-horse-1").to_request(),
    )
    .await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    let refresh_token = body["refresh_token"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(serde_json::json!({ "refresh_token": refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}
