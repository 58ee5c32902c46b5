//! Integration tests for the bearer-protected session routes.
//!
//! Covers the JWT middleware rejections, me, logout-all, and the
//! change-password flow.

use std::sync::Arc;

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

fn register_request(email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(serde_json::json!({
            "name": "Test User",
            "email": email,
            "password": password,
        }))
}

fn refresh_request(refresh_token: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(serde_json::json!({ "refresh_token": refresh_token }))
}

/// Pull `(access_token, refresh_token)` out of a register/login response
async fn tokens_from(
    resp: actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
) -> (String, String) {
    assert!(resp.status().is_success(), "expected success, got {}", resp.status());
    let body: serde_json::Value = test::read_body_json(resp).await;
    (
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}

#[actix_web::test]
async fn test_me_requires_authentication() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert_eq!(body["message"], "Missing or invalid Authorization header");
}

#[actix_web::test]
async fn test_me_returns_profile() {
    let app = test::init_service(create_app(test_state())).await;
    let resp = test::call_service(
        &app,
        register_request("alice@example.com", "correct-horse-1").to_request(),
    )
    .await;
    let (access_token, _) = tokens_from(resp).await;

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {access_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["role"], "user");
    assert!(body.get("password_hash").is_none());
    assert!(body.get("refresh_tokens").is_none());
}

#[actix_web::test]
async fn test_refresh_token_rejected_as_bearer() {
    let app = test::init_service(create_app(test_state())).await;
    let resp = test::call_service(
        &app,
        register_request("alice@example.com", "correct-horse-1").to_request(),
    )
    .await;
    let (_, refresh_token) = tokens_from(resp).await;

    // A refresh token must never pass where an access token is expected.
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {refresh_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid or expired token");
}

#[actix_web::test]
async fn test_malformed_bearer_rejected() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, "Bearer not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    // A header without the Bearer scheme is rejected before verification.
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, "token-without-scheme"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Missing or invalid Authorization header");
}

#[actix_web::test]
async fn test_logout_all_ends_every_session() {
    let app = test::init_service(create_app(test_state())).await;
    let resp = test::call_service(
        &app,
        register_request("alice@example.com", "correct-horse-1").to_request(),
    )
    .await;
    let (access_token, first_refresh) = tokens_from(resp).await;

    // Second device signs in.
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({
            "email": "alice@example.com",
            "password": "correct-horse-1",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let second_refresh = body["refresh_token"].as_str().unwrap().to_string();

    // Both sessions renew before the global logout.
    let resp = test::call_service(&app, refresh_request(&first_refresh).to_request()).await;
    assert_eq!(resp.status(), 200);
    let resp = test::call_service(&app, refresh_request(&second_refresh).to_request()).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::post()
        .uri("/api/auth/logout-all")
        .insert_header((header::AUTHORIZATION, format!("Bearer {access_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Logged out from all devices");

    // Neither session survives.
    let resp = test::call_service(&app, refresh_request(&first_refresh).to_request()).await;
    assert_eq!(resp.status(), 401);
    let resp = test::call_service(&app, refresh_request(&second_refresh).to_request()).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_change_password_rotates_credential_and_sessions() {
    let app = test::init_service(create_app(test_state())).await;
    let resp = test::call_service(
        &app,
        register_request("alice@example.com", "correct-horse-1").to_request(),
    )
    .await;
    let (access_token, refresh_token) = tokens_from(resp).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/change-password")
        .insert_header((header::AUTHORIZATION, format!("Bearer {access_token}")))
        .set_json(serde_json::json!({
            "current_password": "correct-horse-1",
            "new_password": "battery-staple-2",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Password changed successfully");

    // The old password is dead, the new one works.
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({
            "email": "alice@example.com",
            "password": "correct-horse-1",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({
            "email": "alice@example.com",
            "password": "battery-staple-2",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // Sessions from before the change are revoked.
    let resp = test::call_service(&app, refresh_request(&refresh_token).to_request()).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_change_password_requires_current_password() {
    let app = test::init_service(create_app(test_state())).await;
    let resp = test::call_service(
        &app,
        register_request("alice@example.com", "correct-horse-1").to_request(),
    )
    .await;
    let (access_token, _) = tokens_from(resp).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/change-password")
        .insert_header((header::AUTHORIZATION, format!("Bearer {access_token}")))
        .set_json(serde_json::json!({
            "current_password": "wrong-password-1",
            "new_password": "battery-staple-2",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid email or password");
}

#[actix_web::test]
async fn test_unknown_route_returns_not_found_envelope() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get().uri("/api/definitely-not-a-route").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_FOUND");
}
