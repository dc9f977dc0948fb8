//! Observability infrastructure
//!
//! Structured logging via `tracing`. Every component logs through the
//! `tracing` macros; the binary embedding the crate installs the subscriber
//! once with [`init_tracing`].

pub mod logging;

pub use logging::{build_filter, init_tracing};
