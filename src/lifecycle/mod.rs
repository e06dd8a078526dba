//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Unstarted
//!     → Bootstrapping (connect upstream, build routes, bind listener)
//!     → Serving (until the listener fails)
//!     → Terminated
//!
//! Bootstrapping → Terminated on any setup error.
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then upstream, then listener
//! - No signal handling: the process is stopped externally

pub mod startup;

pub use startup::{bootstrap, run, Lifecycle, Phase};
