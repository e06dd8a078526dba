//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect to the remote service
//! - Build the route table and HTTP server
//! - Bind the listener and begin accepting traffic
//! - Track the process phase
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when the channel is ready)
//! - No recovery transitions: once terminated, the process exits

use std::fmt;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::HttpServer;
use crate::observability::metrics;
use crate::routing::RouteTable;
use crate::rpc::{self, GreeterClient};

/// Process phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unstarted,
    Bootstrapping,
    Serving,
    Terminated,
}

impl Phase {
    /// Whether `self → next` is a legal transition.
    pub fn can_transition_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Unstarted, Phase::Bootstrapping)
                | (Phase::Bootstrapping, Phase::Serving)
                | (Phase::Bootstrapping, Phase::Terminated)
                | (Phase::Serving, Phase::Terminated)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Unstarted => "unstarted",
            Phase::Bootstrapping => "bootstrapping",
            Phase::Serving => "serving",
            Phase::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Tracks the current phase and logs transitions.
#[derive(Debug)]
pub struct Lifecycle {
    phase: Phase,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            phase: Phase::Unstarted,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Move to `next`. Illegal transitions are logged and ignored.
    pub fn transition(&mut self, next: Phase) -> bool {
        if !self.phase.can_transition_to(next) {
            tracing::warn!(from = %self.phase, to = %next, "Ignoring illegal lifecycle transition");
            return false;
        }
        tracing::info!(from = %self.phase, to = %next, "Lifecycle transition");
        self.phase = next;
        true
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Connect, wire everything together and bind the listener.
pub async fn bootstrap(config: &GatewayConfig) -> Result<(HttpServer, TcpListener), GatewayError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let channel = rpc::connect(&config.upstream).await?;
    let routes = RouteTable::greeter(Arc::new(GreeterClient::new(channel)));
    let server = HttpServer::new(config.clone(), routes);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    Ok((server, listener))
}

/// Run the gateway until the listener fails.
pub async fn run(config: GatewayConfig) -> Result<(), GatewayError> {
    let mut lifecycle = Lifecycle::new();
    lifecycle.transition(Phase::Bootstrapping);

    let (server, listener) = match bootstrap(&config).await {
        Ok(ready) => ready,
        Err(e) => {
            lifecycle.transition(Phase::Terminated);
            return Err(e);
        }
    };

    lifecycle.transition(Phase::Serving);
    let result = server.run(listener).await;
    lifecycle.transition(Phase::Terminated);
    result
}
