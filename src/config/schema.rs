//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP listener settings.
    pub listener: ListenerConfig,

    /// Remote gRPC service.
    pub upstream: UpstreamConfig,

    /// Request translation limits.
    pub translator: TranslatorConfig,

    /// Static documentation assets.
    pub docs: DocsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8081").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8081".to_string(),
        }
    }
}

/// Remote service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// gRPC server endpoint, `host:port` or a full URI.
    pub endpoint: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Create the channel without dialing; the first call connects.
    pub connect_lazily: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: "localhost:50051".to_string(),
            connect_timeout_secs: 5,
            connect_lazily: false,
        }
    }
}

/// Translator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Largest request body accepted, in bytes.
    pub max_body_bytes: usize,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            // gRPC's default max receive message size
            max_body_bytes: 4 * 1024 * 1024,
        }
    }
}

/// Documentation asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Mount `/swagger.json` and `/swagger-ui/`.
    pub enabled: bool,

    /// OpenAPI document served at `/swagger.json`.
    pub swagger_json: String,

    /// Directory served under `/swagger-ui/`.
    pub swagger_ui_dir: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            swagger_json: "proto/greeter.swagger.json".to_string(),
            swagger_ui_dir: "swagger-ui".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
