//! Gateway error taxonomy.
//!
//! # Responsibilities
//! - Name every failure the gateway can produce
//! - Turn request-scoped failures into HTTP responses
//! - Keep bootstrap failures (connection, listener, config) fatal
//!
//! # Design Decisions
//! - Request-scoped errors never escape the handler; they render as JSON bodies
//!   shaped like a `google.rpc.Status`: `{"code", "message", "details"}`
//! - Remote failures keep the original `tonic::Status` so the code table in
//!   `rpc::status` decides the HTTP status

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tonic::Code;

use crate::config::loader::ConfigError;
use crate::rpc::status::http_status_from_code;

/// Errors raised while bootstrapping or serving the gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The remote service could not be reached (or its address is unusable).
    #[error("failed to connect to gRPC endpoint {endpoint}: {source}")]
    ConnectionSetup {
        endpoint: String,
        #[source]
        source: tonic::transport::Error,
    },

    /// No route matched the request.
    #[error("no route for {method} {path}")]
    RouteNotFound { method: Method, path: String },

    /// The request could not be decoded into the procedure's input message.
    #[error("{0}")]
    InvalidArgument(String),

    /// The remote procedure returned a non-OK status.
    #[error("remote call failed: {}", .0.message())]
    RemoteCall(#[from] tonic::Status),

    /// The HTTP listener failed to bind or stopped serving.
    #[error("listener error: {0}")]
    Listener(#[from] std::io::Error),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GatewayError {
    /// Build an `InvalidArgument` error from anything printable.
    pub fn invalid_argument(message: impl std::fmt::Display) -> Self {
        GatewayError::InvalidArgument(message.to_string())
    }

    /// gRPC code this error is reported under.
    pub fn code(&self) -> Code {
        match self {
            GatewayError::RouteNotFound { .. } => Code::NotFound,
            GatewayError::InvalidArgument(_) => Code::InvalidArgument,
            GatewayError::RemoteCall(status) => status.code(),
            GatewayError::ConnectionSetup { .. } => Code::Unavailable,
            GatewayError::Listener(_) | GatewayError::Config(_) => Code::Internal,
        }
    }

    /// HTTP status the error is rendered with.
    pub fn http_status(&self) -> StatusCode {
        http_status_from_code(self.code())
    }

    /// Message placed in the response body.
    fn body_message(&self) -> String {
        match self {
            GatewayError::RouteNotFound { .. } => "Not Found".to_string(),
            GatewayError::RemoteCall(status) => status.message().to_string(),
            other => other.to_string(),
        }
    }
}

/// JSON error body returned to HTTP clients.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: i32,
    pub message: String,
    pub details: Vec<serde_json::Value>,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        let body = ErrorBody {
            code: self.code() as i32,
            message: self.body_message(),
            details: Vec::new(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_not_found_renders_404() {
        let err = GatewayError::RouteNotFound {
            method: Method::GET,
            path: "/nope".into(),
        };
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code() as i32, 5);
        assert_eq!(err.body_message(), "Not Found");
    }

    #[test]
    fn test_remote_message_passes_through() {
        let err = GatewayError::from(tonic::Status::permission_denied("nope, not you"));
        assert_eq!(err.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(err.body_message(), "nope, not you");
    }

    #[test]
    fn test_invalid_argument_is_400() {
        let err = GatewayError::invalid_argument("bad json");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "bad json");
    }
}
