//! gRPC Gateway
//!
//! Serves a JSON/HTTP API in front of a single gRPC service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace span ─▶ CORS ─┬─▶ /swagger.json, /swagger-ui/*
//!                                                       │
//!                                                       └─▶ translator
//!                                                             │ route table match
//!                                                             │ JSON → message
//!                                                             ▼
//!     Client Response                                    gRPC channel ─────▶ gRPC server
//!     ◀────────────── JSON body / error body ◀────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use grpc_gateway::config::loader::{finalize, load_config};
use grpc_gateway::config::GatewayConfig;
use grpc_gateway::lifecycle;
use grpc_gateway::GatewayError;
use grpc_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "grpc-gateway")]
#[command(about = "HTTP/JSON gateway in front of a gRPC service", long_about = None)]
struct Cli {
    /// gRPC server endpoint
    #[arg(long = "grpc-server-endpoint")]
    grpc_server_endpoint: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log output format (overrides the config file)
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

impl Cli {
    /// File config (or defaults) with command-line overrides applied.
    fn into_config(self) -> Result<GatewayConfig, GatewayError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GatewayConfig::default(),
        };

        if let Some(endpoint) = self.grpc_server_endpoint {
            config.upstream.endpoint = endpoint;
        }
        if let Some(format) = self.log_format {
            config.observability.json_logs = matches!(format, LogFormat::Json);
        }

        Ok(finalize(config)?)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.observability) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        grpc_server_endpoint = %config.upstream.endpoint,
        bind_address = %config.listener.bind_address,
        "grpc-gateway starting"
    );

    match lifecycle::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start gRPC gateway");
            ExitCode::FAILURE
        }
    }
}
