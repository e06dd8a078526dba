//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span)
//!     → middleware/cors.rs (reflect Origin, answer preflight)
//!     → docs.rs (static assets) | server.rs translator fallback
//!     → request.rs (metadata, deadline) + translate.rs (input message)
//!     → [route invoker → gRPC call]
//!     → JSON response or error body
//! ```

pub mod docs;
pub mod middleware;
pub mod request;
pub mod server;
pub mod translate;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
