#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use http_body_util::BodyExt;

use gatehouse::router::init_router;
use gatehouse::state::init_app_state;
use gatehouse_auth::{Claims, create_access_token, encode_claims};
use gatehouse_config::{AppConfig, JwtConfig, RateLimitConfig};
use gatehouse_core::Identity;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-characters-long";
pub const TEST_CLIENT_IP: &str = "192.168.1.100";

pub fn test_config() -> AppConfig {
    AppConfig::from_vars(|key| match key {
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn test_jwt_config() -> JwtConfig {
    test_config().jwt
}

pub fn setup_test_app() -> Router {
    setup_test_app_with_config(test_config())
}

pub fn setup_test_app_with_rate_limit(rate_limit: RateLimitConfig) -> Router {
    let mut config = test_config();
    config.rate_limit = rate_limit;
    setup_test_app_with_config(config)
}

pub fn setup_test_app_with_config(config: AppConfig) -> Router {
    let state = init_app_state(&config).unwrap();
    init_router(state)
}

pub fn identity_with_roles(roles: &[&str]) -> Identity {
    Identity::new("u1", "a@b.com").with_roles(roles.iter().copied())
}

pub fn token_for(identity: &Identity) -> String {
    create_access_token(identity, &test_jwt_config()).unwrap()
}

pub fn token_with_roles(roles: &[&str]) -> String {
    token_for(&identity_with_roles(roles))
}

pub fn expired_token(identity: &Identity) -> String {
    let claims = Claims::for_identity(identity, -3600);
    encode_claims(&claims, &test_jwt_config()).unwrap()
}

pub fn forged_token(identity: &Identity) -> String {
    let forged = JwtConfig::with_secret("different-secret-key-at-least-32-characters");
    create_access_token(identity, &forged).unwrap()
}

/// Builds a request from [`TEST_CLIENT_IP`], with a bearer token when given.
pub fn request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    request_from(method, uri, token, TEST_CLIENT_IP)
}

pub fn request_from(method: Method, uri: &str, token: Option<&str>, ip: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", ip);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    builder.body(Body::empty()).unwrap()
}

pub fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", TEST_CLIENT_IP)
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

/// Asserts the uniform `{statusCode, message, error}` error body.
pub async fn assert_error_envelope(response: Response<Body>, status: u16, error: &str) {
    assert_eq!(response.status().as_u16(), status);
    let body = body_json(response).await;
    assert_eq!(body["statusCode"], status);
    assert_eq!(body["error"], error);
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    assert_eq!(body.as_object().unwrap().len(), 3);
}
