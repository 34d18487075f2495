//! In-process router tests.
//!
//! The pool connects lazily, so only requests that never reach the database
//! are exercised here: access control, validation, auth, menu and demo routes.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use library_demo::{
    api,
    config::{AppConfig, UserEntry},
    repository::Repository,
    services::Services,
    AppState,
};

fn app() -> Router {
    let mut config = AppConfig::default();
    config.auth.users = vec![UserEntry {
        login: "user".to_string(),
        password: "user".to_string(),
        roles: vec!["user".to_string()],
    }];

    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("Invalid database url");
    let services = Services::new(Repository::new(pool), &config).expect("Failed to create services");

    api::router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            json!({ "login": "user", "password": "user" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
async fn test_landing_menu() {
    let response = app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["is_dev_server"], false);
    assert_eq!(body["routes"]["Simple controller"], "/demo/simple");
    assert_eq!(body["routes"]["Hello controller"], "/demo/hello/world");
    // No CA settings in the default configuration
    assert_eq!(body["routes"]["HTTP client demo"]["uri"], "/demo/http-call");
    assert!(body["routes"]["HTTP client demo"]["note"].is_string());
}

#[tokio::test]
async fn test_demo_routes() {
    let app = app();

    let response = app
        .clone()
        .oneshot(Request::get("/demo/simple").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::get("/demo/hello/world").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Hello world!");
}

#[tokio::test]
async fn test_api_entrypoint() {
    let response = app()
        .oneshot(Request::get("/api/v1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["books"], "/api/v1/books");
    assert_eq!(body["reviews"], "/api/v1/reviews");
}

#[tokio::test]
async fn test_anonymous_write_is_unauthorized() {
    let response = app()
        .oneshot(json_request("POST", "/api/v1/books", json!({ "title": "Watchmen" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Only authenticated users can add books.");
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let request = Request::get("/api/v1/books")
        .header(header::AUTHORIZATION, "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_out_of_range_page_is_rejected() {
    let uri = format!("/api/v1/books?page={}", i64::MAX);
    let response = app()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_and_me() {
    let app = app();
    let token = login(&app).await;

    let request = Request::get("/api/v1/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["login"], "user");
    assert_eq!(body["roles"], json!(["user"]));
}

#[tokio::test]
async fn test_wrong_password() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            json!({ "login": "user", "password": "nope" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_blank_title_is_rejected() {
    let app = app();
    let token = login(&app).await;

    let mut request = json_request("POST", "/api/v1/books", json!({ "title": "   " }));
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", token).parse().unwrap(),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_openapi_document() {
    let response = app()
        .oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["paths"]["/books"].is_object());
}
