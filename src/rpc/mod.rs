//! Remote procedure subsystem.
//!
//! # Data Flow
//! ```text
//! UpstreamConfig (endpoint string)
//!     → connect() (tonic Endpoint → Channel)
//!     → GreeterClient (shared, cloned per call)
//!     → unary call → Response | Status
//!     → status.rs (Status code → HTTP status)
//! ```
//!
//! # Design Decisions
//! - One channel for the process lifetime; tonic reconnects underneath
//! - No retries: a failed call is reported, never replayed
//! - Endpoints without a scheme are treated as plaintext `http://`

pub mod greeter;
pub mod status;

use std::time::Duration;

use tonic::transport::{Channel, Endpoint};

use crate::config::schema::UpstreamConfig;
use crate::error::GatewayError;

pub use greeter::{Greeter, GreeterClient, GreetRequest, GreetResponse};

/// Prefix a bare `host:port` with `http://`.
pub fn endpoint_uri(endpoint: &str) -> String {
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    }
}

/// Open the channel to the remote service.
///
/// Unless `connect_lazily` is set this waits for the first connection, so an
/// unreachable service fails bootstrap instead of the first request.
pub async fn connect(config: &UpstreamConfig) -> Result<Channel, GatewayError> {
    let setup_error = |source| GatewayError::ConnectionSetup {
        endpoint: config.endpoint.clone(),
        source,
    };

    let endpoint = Endpoint::from_shared(endpoint_uri(&config.endpoint))
        .map_err(setup_error)?
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

    if config.connect_lazily {
        tracing::info!(endpoint = %config.endpoint, "gRPC channel created (lazy)");
        return Ok(endpoint.connect_lazy());
    }

    let channel = endpoint.connect().await.map_err(setup_error)?;
    tracing::info!(endpoint = %config.endpoint, "Connected to gRPC endpoint");
    Ok(channel)
}
