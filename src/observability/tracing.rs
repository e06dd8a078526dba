//! Request spans.
//!
//! Every request runs inside a `request` span carrying method, path and the
//! request ID, so log lines from the translator and the gRPC client correlate.

use axum::http::Request;
use tower_http::trace::MakeSpan;
use tracing::Span;

use crate::http::request::X_REQUEST_ID;

/// Builds the per-request span for `TraceLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");

        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id = %request_id,
        )
    }
}
