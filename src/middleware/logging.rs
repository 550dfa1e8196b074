use std::{net::SocketAddr, time::Instant};

use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, Request, State},
    http::{
        header::{AUTHORIZATION, CONTENT_LENGTH, COOKIE, USER_AGENT},
        HeaderMap,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body::Body as _;
use tracing::Level;

use super::capture::{CapturedBody, CompletionRecord};
use crate::errors::AppError;

pub const REMOTE_USER_HEADER: &str = "x-remote-user";

const REDACTED: &str = "[REDACTED]";

#[derive(Debug, Clone)]
pub struct RequestLogSettings {
    /// Largest request body that is drained into the detailed start record.
    pub max_body_bytes: usize,
}

/// Outermost layer: one start record on entry, one completion record once the
/// response body has been handed to the client.
///
/// The detailed start record (headers and body) is written whenever the
/// active subscriber has DEBUG enabled for this module.
pub async fn log_requests(
    State(settings): State<RequestLogSettings>,
    req: Request,
    next: Next,
) -> Response {
    let started = Instant::now();

    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let user = header_str(req.headers(), REMOTE_USER_HEADER).to_string();
    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let agent = header_str(req.headers(), USER_AGENT.as_str()).to_string();

    let response = if tracing::enabled!(Level::DEBUG) {
        let (parts, body) = req.into_parts();
        let headers = redacted_headers(&parts.headers);

        let (req, request_body) = if exceeds_limit(&parts.headers, &body, settings.max_body_bytes) {
            let omitted = format!("[omitted: larger than {} bytes]", settings.max_body_bytes);
            (Ok(Request::from_parts(parts, body)), omitted)
        } else {
            match to_bytes(body, settings.max_body_bytes).await {
                Ok(bytes) => {
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    (Ok(Request::from_parts(parts, Body::from(bytes))), text)
                }
                Err(err) => (Err(err), String::new()),
            }
        };

        tracing::debug!(
            method = %method,
            path = %path,
            user = %user,
            remote_addr = %remote_addr,
            agent = %agent,
            headers = ?headers,
            request_body = %request_body,
            "Request received (detailed information)"
        );

        match req {
            Ok(req) => next.run(req).await,
            Err(err) => {
                tracing::warn!(method = %method, path = %path, error = %err, "failed to read request body");
                AppError::Validation("Unable to read request body".into()).into_response()
            }
        }
    } else {
        tracing::info!(
            method = %method,
            path = %path,
            user = %user,
            remote_addr = %remote_addr,
            agent = %agent,
            "Request received"
        );
        next.run(req).await
    };

    let record = CompletionRecord {
        method,
        path,
        user,
        remote_addr,
        status: response.status(),
        started,
    };
    let (parts, body) = response.into_parts();
    Response::from_parts(parts, Body::new(CapturedBody::new(body, record)))
}

/// A body known up front to be over the limit is passed through unread.
fn exceeds_limit(headers: &HeaderMap, body: &Body, limit: usize) -> bool {
    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    let at_least = declared.unwrap_or(0).max(body.size_hint().lower());
    at_least > limit as u64
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn redacted_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if name == AUTHORIZATION || name == COOKIE {
                REDACTED.to_string()
            } else {
                String::from_utf8_lossy(value.as_bytes()).into_owned()
            };
            (name.as_str().to_string(), shown)
        })
        .collect()
}
