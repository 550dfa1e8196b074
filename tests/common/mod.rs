#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use books_api::{config::Config, routes::app_router, state::AppState};
use http_body_util::BodyExt; // for .collect().await
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

/// Defaults with a cheap password hash so tests stay fast.
pub fn test_config() -> Config {
    Config {
        password_hash_memory_kib: 1024,
        password_hash_iterations: 1,
        ..Config::default()
    }
}

pub fn app_with(cfg: &Config) -> Router {
    app_router(Arc::new(AppState::new(cfg).unwrap()))
}

pub fn test_app() -> Router {
    app_with(&test_config())
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Status plus parsed JSON body (`Value::Null` for an empty body).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Registers `username` and logs in; returns `(access_token, refresh_token)`.
pub async fn signed_in(app: &Router, username: &str) -> (String, String) {
    let creds = json!({ "username": username, "password": "pw1" });

    let (status, _) = send(app, json_request("POST", "/auth/register", None, creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, json_request("POST", "/auth/login", None, creds)).await;
    assert_eq!(status, StatusCode::OK);
    (
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}
