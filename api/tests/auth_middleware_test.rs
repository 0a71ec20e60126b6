//! Integration tests for JWT authentication middleware

mod common;

use actix_web::{http::StatusCode, test, web, App, HttpResponse};
use serde_json::{json, Value};
use um_api::middleware::auth::{AuthContext, JwtAuth};
use um_core::domain::entities::user::Role;
use um_core::services::{TokenService, TokenServiceConfig};

use common::{stored_user, SECRET};

fn token_service(secret: &str, ttl: i64) -> TokenService {
    TokenService::new(TokenServiceConfig {
        jwt_secret: secret.to_string(),
        access_token_ttl_seconds: ttl,
    })
}

async fn whoami(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "id": auth.id.to_string(),
        "role": auth.role,
    }))
}

#[actix_web::test]
async fn test_middleware_requires_auth_header() {
    let app = test::init_service(
        App::new()
            .wrap(JwtAuth::new(token_service(SECRET, 3600)))
            .route("/protected", web::get().to(whoami)),
    )
    .await;

    let req = test::TestRequest::get().uri("/protected").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Access denied." }));
}

#[actix_web::test]
async fn test_middleware_rejects_invalid_token() {
    let app = test::init_service(
        App::new()
            .wrap(JwtAuth::new(token_service(SECRET, 3600)))
            .route("/protected", web::get().to(whoami)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(("Authorization", "Bearer invalid-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Invalid token." }));
}

#[actix_web::test]
async fn test_middleware_rejects_foreign_signature() {
    let user = stored_user("Jon Doe", "jondoe@example.com", Role::User);
    let forged = token_service("another-secret", 3600)
        .issue_access_token(&user.view())
        .unwrap();

    let app = test::init_service(
        App::new()
            .wrap(JwtAuth::new(token_service(SECRET, 3600)))
            .route("/protected", web::get().to(whoami)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(("Authorization", format!("Bearer {}", forged)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_middleware_rejects_expired_token() {
    let user = stored_user("Jon Doe", "jondoe@example.com", Role::User);
    let expired = token_service(SECRET, -120)
        .issue_access_token(&user.view())
        .unwrap();

    let app = test::init_service(
        App::new()
            .wrap(JwtAuth::new(token_service(SECRET, 3600)))
            .route("/protected", web::get().to(whoami)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(("Authorization", format!("Bearer {}", expired)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_middleware_injects_auth_context() {
    let user = stored_user("The Boss", "theboss@example.com", Role::Admin);
    let tokens = token_service(SECRET, 3600);
    let token = tokens.issue_access_token(&user.view()).unwrap();

    let app = test::init_service(
        App::new()
            .wrap(JwtAuth::new(tokens))
            .route("/protected", web::get().to(whoami)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], user.id.to_string());
    assert_eq!(body["role"], "ADMIN");
}

#[actix_web::test]
async fn test_auth_context_extractor_without_middleware() {
    let app = test::init_service(App::new().route("/protected", web::get().to(whoami))).await;

    let req = test::TestRequest::get().uri("/protected").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_register_route_is_public() {
    let h = common::Harness::new();
    let app = test::init_service(um_api::create_app(h.state.clone())).await;

    let req = test::TestRequest::get().uri("/api/user/list").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(json!({
            "name": "Jane Roe",
            "email": "janeroe@example.com",
            "password": "secret",
            "role": "USER"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
