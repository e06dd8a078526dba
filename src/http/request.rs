//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4)
//! - Collect headers that travel to the remote service as gRPC metadata
//! - Parse the client's `Grpc-Timeout` deadline
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - `Grpc-Metadata-<key>` headers forward as `<key>`; `authorization` and
//!   `x-request-id` forward unchanged; everything else stays at the gateway
//! - Headers that are not valid metadata are dropped, not rejected

use std::time::Duration;

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request};
use tonic::metadata::{AsciiMetadataKey, AsciiMetadataValue, MetadataMap};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::error::GatewayError;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Prefix of headers forwarded as gRPC metadata.
pub const METADATA_HEADER_PREFIX: &str = "grpc-metadata-";

/// Header carrying the client's call deadline.
pub const GRPC_TIMEOUT: HeaderName = HeaderName::from_static("grpc-timeout");

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID of a request, or `"unknown"` when none was assigned.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Build the gRPC metadata forwarded for a request.
pub fn forwarded_metadata(headers: &HeaderMap) -> MetadataMap {
    let mut metadata = MetadataMap::new();

    for (name, value) in headers {
        let key = match name.as_str().strip_prefix(METADATA_HEADER_PREFIX) {
            Some(key) => key,
            None if *name == header::AUTHORIZATION || *name == X_REQUEST_ID => name.as_str(),
            None => continue,
        };

        let parsed = (
            AsciiMetadataKey::from_bytes(key.as_bytes()),
            AsciiMetadataValue::try_from(value.as_bytes()),
        );
        match parsed {
            (Ok(key), Ok(value)) => {
                metadata.append(key, value);
            }
            _ => tracing::debug!(header = %name, "Skipping header that is not valid gRPC metadata"),
        }
    }

    metadata
}

/// Parse a gRPC timeout value: up to 8 digits followed by a unit
/// (`H`, `M`, `S`, `m`, `u`, `n`).
pub fn parse_grpc_timeout(value: &str) -> Result<Duration, GatewayError> {
    let invalid = || GatewayError::invalid_argument(format!("invalid grpc-timeout: {:?}", value));

    if !value.is_ascii() || value.len() < 2 || value.len() > 9 {
        return Err(invalid());
    }
    let (digits, unit) = value.split_at(value.len() - 1);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let amount: u64 = digits.parse().map_err(|_| invalid())?;

    match unit {
        "H" => Ok(Duration::from_secs(amount * 3600)),
        "M" => Ok(Duration::from_secs(amount * 60)),
        "S" => Ok(Duration::from_secs(amount)),
        "m" => Ok(Duration::from_millis(amount)),
        "u" => Ok(Duration::from_micros(amount)),
        "n" => Ok(Duration::from_nanos(amount)),
        _ => Err(invalid()),
    }
}

/// Deadline requested through the `Grpc-Timeout` header, if any.
pub fn call_timeout(headers: &HeaderMap) -> Result<Option<Duration>, GatewayError> {
    match headers.get(GRPC_TIMEOUT) {
        Some(value) => {
            let value = value
                .to_str()
                .map_err(|_| GatewayError::invalid_argument("invalid grpc-timeout header"))?;
            parse_grpc_timeout(value).map(Some)
        }
        None => Ok(None),
    }
}
