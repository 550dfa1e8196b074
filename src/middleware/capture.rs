//! Pass-through response body that keeps a copy for the completion record.

use std::{
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use axum::{body::Body, http::StatusCode};
use bytes::{Bytes, BytesMut};
use http_body::{Frame, SizeHint};

/// What the pipeline knows about a request once the handler has answered.
#[derive(Debug)]
pub struct CompletionRecord {
    pub method: String,
    pub path: String,
    pub user: String,
    pub remote_addr: String,
    pub status: StatusCode,
    pub started: Instant,
}

impl CompletionRecord {
    fn emit(self, captured: Option<&[u8]>) {
        let duration = self.started.elapsed();
        match captured {
            Some(body) => tracing::info!(
                method = %self.method,
                path = %self.path,
                user = %self.user,
                remote_addr = %self.remote_addr,
                status_code = self.status.as_u16(),
                response_body = %String::from_utf8_lossy(body),
                duration = ?duration,
                "Response sent"
            ),
            None => tracing::info!(
                method = %self.method,
                path = %self.path,
                user = %self.user,
                remote_addr = %self.remote_addr,
                status_code = self.status.as_u16(),
                duration = ?duration,
                "Response sent"
            ),
        }
    }
}

/// Frames are forwarded as soon as the inner body yields them. Error
/// responses (status >= 400) are also copied into a buffer. The record is
/// emitted once, at end of stream or on drop.
pub struct CapturedBody {
    inner: Body,
    captured: Option<BytesMut>,
    record: Option<CompletionRecord>,
}

impl CapturedBody {
    pub fn new(inner: Body, record: CompletionRecord) -> Self {
        let captured = (record.status.as_u16() >= 400).then(BytesMut::new);
        Self {
            inner,
            captured,
            record: Some(record),
        }
    }

    fn finish(&mut self) {
        if let Some(record) = self.record.take() {
            record.emit(self.captured.as_deref());
        }
    }
}

impl http_body::Body for CapturedBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let polled = Pin::new(&mut this.inner).poll_frame(cx);

        match &polled {
            Poll::Ready(Some(Ok(frame))) => {
                if let (Some(buf), Some(data)) = (this.captured.as_mut(), frame.data_ref()) {
                    buf.extend_from_slice(data);
                }
            }
            Poll::Ready(None) | Poll::Ready(Some(Err(_))) => this.finish(),
            Poll::Pending => {}
        }

        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl Drop for CapturedBody {
    fn drop(&mut self) {
        self.finish();
    }
}
