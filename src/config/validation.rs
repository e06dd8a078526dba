//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses parse and limits are non-zero
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use tonic::transport::Endpoint;

use crate::config::schema::GatewayConfig;
use crate::rpc::endpoint_uri;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("not a socket address: {:?}", config.listener.bind_address),
        ));
    }

    if config.upstream.endpoint.trim().is_empty() {
        errors.push(ValidationError::new("upstream.endpoint", "must not be empty"));
    } else if Endpoint::from_shared(endpoint_uri(&config.upstream.endpoint)).is_err() {
        errors.push(ValidationError::new(
            "upstream.endpoint",
            format!("not a valid URI: {:?}", config.upstream.endpoint),
        ));
    }

    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "upstream.connect_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.translator.max_body_bytes == 0 {
        errors.push(ValidationError::new(
            "translator.max_body_bytes",
            "must be greater than zero",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("not a socket address: {:?}", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
