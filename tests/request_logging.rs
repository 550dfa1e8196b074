//! Start and completion records emitted by the logging layer.

mod common;

use std::{
    io,
    net::SocketAddr,
    pin::Pin,
    sync::{Arc, Mutex},
    task::{Context, Poll},
};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
};
use bytes::Bytes;
use http_body::Frame;
use books_api::config::Config;
use common::{app_with, empty_request, json_request, send, test_app, test_config};
use serde_json::{json, Value};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn records(&self) -> Vec<Value> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    fn with_message(&self, message: &str) -> Vec<Value> {
        self.records()
            .into_iter()
            .filter(|r| r["fields"]["message"] == message)
            .map(|r| r["fields"].clone())
            .collect()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs(level: Level) -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(level)
        .with_writer(buffer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}

/// Request body whose first read fails.
struct BrokenBody;

impl http_body::Body for BrokenBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(Some(Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"))))
    }
}

#[tokio::test]
async fn one_start_and_one_completion_record_per_request() {
    let (logs, _guard) = capture_logs(Level::INFO);
    let app = test_app();

    let mut request = empty_request("GET", "/books", None);
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 7], 4242))));
    request
        .headers_mut()
        .insert("x-remote-user", "proxy-user".parse().unwrap());

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let started = logs.with_message("Request received");
    assert_eq!(started.len(), 1);
    assert_eq!(started[0]["method"], "GET");
    assert_eq!(started[0]["path"], "/books");
    assert_eq!(started[0]["user"], "proxy-user");
    assert_eq!(started[0]["remote_addr"], "10.0.0.7:4242");

    let done = logs.with_message("Response sent");
    assert_eq!(done.len(), 1);
    assert_eq!(done[0]["status_code"], 401);
    assert!(done[0]["duration"].is_string());
    let logged: Value = serde_json::from_str(done[0]["response_body"].as_str().unwrap()).unwrap();
    assert_eq!(logged["message"], "authorization header required");
}

#[tokio::test]
async fn successful_responses_are_logged_without_body() {
    let (logs, _guard) = capture_logs(Level::INFO);
    let app = test_app();

    let (status, _) = send(
        &app,
        json_request("POST", "/auth/register", None, json!({ "username": "alice", "password": "pw1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let done = logs.with_message("Response sent");
    assert_eq!(done.len(), 1);
    assert_eq!(done[0]["status_code"], 201);
    assert_eq!(done[0]["remote_addr"], "unknown");
    assert!(done[0].get("response_body").is_none());
}

#[tokio::test]
async fn configured_debug_level_under_an_info_subscriber_keeps_the_start_record() {
    let (logs, _guard) = capture_logs(Level::INFO);
    let app = app_with(&Config {
        log_level: "debug".into(),
        ..test_config()
    });

    let (status, _) = send(&app, empty_request("GET", "/books", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let messages: Vec<_> = logs
        .records()
        .into_iter()
        .filter_map(|r| r["fields"]["message"].as_str().map(str::to_string))
        .collect();
    assert_eq!(messages, ["Request received", "Response sent"]);
}

#[tokio::test]
async fn debug_subscriber_logs_the_request_body_and_still_serves_it() {
    let (logs, _guard) = capture_logs(Level::DEBUG);
    let app = test_app();

    let creds = json!({ "username": "alice", "password": "pw1" });
    let (status, _) = send(&app, json_request("POST", "/auth/register", None, creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut request = json_request("POST", "/auth/login", None, creds);
    request
        .headers_mut()
        .insert("cookie", "session=secret".parse().unwrap());
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());

    let detailed = logs.with_message("Request received (detailed information)");
    assert_eq!(detailed.len(), 2);
    let login = &detailed[1];
    assert_eq!(login["path"], "/auth/login");
    assert!(login["request_body"].as_str().unwrap().contains("\"username\":\"alice\""));
    let headers = login["headers"].as_str().unwrap();
    assert!(!headers.contains("session=secret"));
    assert!(headers.contains("[REDACTED]"));

    assert!(logs.with_message("Request received").is_empty());
    assert_eq!(logs.with_message("Response sent").len(), 2);
}

#[tokio::test]
async fn body_over_the_log_limit_is_passed_through_unlogged() {
    let (logs, _guard) = capture_logs(Level::DEBUG);
    let app = app_with(&Config {
        max_logged_body_bytes: 8,
        ..test_config()
    });

    let creds = json!({ "username": "alice", "password": "pw1" });
    let (status, _) = send(&app, json_request("POST", "/auth/register", None, creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, json_request("POST", "/auth/login", None, creds)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());

    let detailed = logs.with_message("Request received (detailed information)");
    assert_eq!(detailed.len(), 2);
    assert_eq!(detailed[1]["request_body"], "[omitted: larger than 8 bytes]");
    assert_eq!(logs.with_message("Response sent").len(), 2);
}

#[tokio::test]
async fn unreadable_body_is_rejected_and_still_logged() {
    let (logs, _guard) = capture_logs(Level::DEBUG);
    let app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::new(BrokenBody))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");

    assert_eq!(logs.with_message("Request received (detailed information)").len(), 1);
    let done = logs.with_message("Response sent");
    assert_eq!(done.len(), 1);
    assert_eq!(done[0]["status_code"], 400);
}
