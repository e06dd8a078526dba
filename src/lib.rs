//! HTTP/JSON → gRPC gateway library.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod rpc;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use routing::RouteTable;
