//! HTTP middleware applied to every route.

pub mod cors;

pub use cors::allow_cors;
