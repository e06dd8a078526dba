//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → table.rs (route lookup, first match wins)
//!     → pattern.rs (segment match, capture path fields)
//!     → Return: RouteMatch (route + captures) or no match
//!
//! Route construction (at startup):
//!     RouteTable::greeter(client)
//!     → one Route per HTTP binding
//!     → frozen, shared via Arc
//! ```
//!
//! # Design Decisions
//! - Routes built at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same route
//! - Explicit no-match rather than silent default

pub mod pattern;
pub mod table;

pub use pattern::PathPattern;
pub use table::{unary, BodyRule, CallInput, Invoker, Route, RouteMatch, RouteTable};
