//! # ShiftClock Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The SQLite shift store (r2d2 pool, schema migrations)
//! - The retrying HTTP client and the TimezoneDB lookup
//! - Configuration loading and tracing setup
//! - Bootstrap wiring of the shift service
//!
//! ## Architecture
//! - Implements traits defined in `shiftclock-core`
//! - Contains all "impure" code (I/O, network, filesystem)

pub mod bootstrap;
pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;

// Re-export commonly used items
pub use bootstrap::{build, build_resolver, AppContext};
pub use database::{DbConnection, DbManager, SqliteShiftRepository};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::timezonedb::TimezoneDbClient;
pub use observability::init_tracing;
