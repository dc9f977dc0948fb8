//! TimezoneDB integration for coordinate-to-zone lookups
//!
//! The external tier of timezone resolution. Only consulted when the local
//! catalog has no match and an API key is configured.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use shiftclock_core::{TieredTimezoneResolver, ZoneCatalog};
//! use shiftclock_domain::TimezoneConfig;
//! use shiftclock_infra::integrations::timezonedb::TimezoneDbClient;
//!
//! let config = TimezoneConfig { api_key: Some("key".into()), ..TimezoneConfig::default() };
//! let mut resolver = TieredTimezoneResolver::new(ZoneCatalog::builtin());
//! if let Some(client) = TimezoneDbClient::from_config(&config)? {
//!     resolver = resolver.with_lookup(Arc::new(client), Duration::from_millis(config.timeout_ms));
//! }
//! # Ok::<(), shiftclock_domain::ShiftClockError>(())
//! ```
//!
//! # Error Handling
//!
//! - **Transport errors and 5xx**: retried by `HttpClient`, then surfaced
//!   as `Network`
//! - **Non-OK status in the body**: not an error, just no answer

pub mod client;
pub mod types;

pub use client::TimezoneDbClient;
pub use types::TimezoneDbResponse;
