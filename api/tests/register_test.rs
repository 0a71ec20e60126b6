//! Integration tests for POST /api/register

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use um_api::create_app;
use um_core::domain::entities::user::Role;
use um_core::errors::{StoreError, StoreErrorCode};
use um_core::repositories::RepositoryCall;

use common::Harness;

fn new_account() -> Value {
    json!({
        "name": "Jane Roe",
        "email": "janeroe@example.com",
        "password": "correct horse",
        "role": "USER"
    })
}

#[actix_web::test]
async fn test_register_returns_user_with_token() {
    let h = Harness::new();
    let app = test::init_service(create_app(h.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(new_account())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User registered successfully.");
    assert_eq!(body["user"]["email"], "janeroe@example.com");
    assert!(body["user"].get("password").is_none());

    let token = body["user"]["access_token"].as_str().unwrap();
    let claims = h.tokens.verify_access_token(token).unwrap();
    assert_eq!(claims.email, "janeroe@example.com");
    assert_eq!(claims.role, Role::User);

    let stored = h.stored("janeroe@example.com").await.unwrap();
    assert_eq!(stored.access_token, token);
    assert_ne!(stored.password, "correct horse");
    assert!(bcrypt::verify("correct horse", &stored.password).unwrap());
}

#[actix_web::test]
async fn test_register_existing_email_is_rejected_before_create() {
    let h = Harness::new();
    let app = test::init_service(create_app(h.state.clone())).await;

    let mut account = new_account();
    account["email"] = json!("jondoe@example.com");

    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(account)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "PAYLOAD_ERROR");
    assert_eq!(
        body["message"],
        "User.register() error: This email is already registered."
    );
    assert_eq!(h.repo.calls(RepositoryCall::Create).await, 0);
}

#[actix_web::test]
async fn test_register_reports_every_missing_field() {
    let h = Harness::new();
    let app = test::init_service(create_app(h.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "PAYLOAD_ERROR");

    let metadata = body["metadata"].as_array().unwrap();
    let keys: Vec<&str> = metadata.iter().map(|m| m["key"].as_str().unwrap()).collect();
    assert_eq!(keys, vec!["email", "name", "password", "role"]);
    assert!(metadata.iter().all(|m| m["reason"] == "FIELD_IS_REQUIRED"));
}

#[actix_web::test]
async fn test_register_rejects_unknown_role() {
    let h = Harness::new();
    let app = test::init_service(create_app(h.state.clone())).await;

    let mut account = new_account();
    account["role"] = json!("SUPERUSER");

    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(account)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["metadata"][0]["key"], "role");
    assert_eq!(body["metadata"][0]["value"], "SUPERUSER");
    assert_eq!(body["metadata"][0]["reason"], "MUST_CHOSE_OPTION");
}

#[actix_web::test]
async fn test_register_rejects_non_string_name() {
    let h = Harness::new();
    let app = test::init_service(create_app(h.state.clone())).await;

    let mut account = new_account();
    account["name"] = json!(42);

    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(account)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "PAYLOAD_ERROR");
    assert_eq!(body["metadata"][0]["reason"], "MUST_BE_STRING");
    assert_eq!(body["metadata"][0]["value"], "42");
}

#[actix_web::test]
async fn test_register_rejects_malformed_json() {
    let h = Harness::new();
    let app = test::init_service(create_app(h.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/register")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "PAYLOAD_ERROR");
}

#[actix_web::test]
async fn test_failed_token_storage_rolls_back_registration() {
    let h = Harness::new();
    h.repo
        .fail_on(
            RepositoryCall::SetAccessToken,
            StoreError::new(StoreErrorCode::Connection, "connection reset"),
        )
        .await;
    let app = test::init_service(create_app(h.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(new_account())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "DATABASE_ERROR");
    assert_eq!(
        body["message"],
        "User.register() error: Could not register the user."
    );

    assert_eq!(h.repo.calls(RepositoryCall::Create).await, 1);
    assert!(h.stored("janeroe@example.com").await.is_none());
}
