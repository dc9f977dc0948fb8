//! # ShiftClock Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The shift lifecycle manager (create, update, clock on/off, remove)
//! - The enriched shift view with local-time fields
//! - Tiered timezone resolution and local-time formatting
//! - Port/adapter interfaces (traits) for the shift store, the external
//!   timezone lookup and the clock
//!
//! ## Architecture Principles
//! - Only depends on `shiftclock-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod clock_ports;
pub mod shift;
pub mod timezone;

// Re-export specific items to avoid ambiguity
pub use clock_ports::{Clock, FixedClock, SystemClock};
pub use shift::ports::ShiftRepository;
pub use shift::{ShiftService, ShiftView};
pub use timezone::ports::{
    ResolvedTimezone, TimezoneLookup, TimezoneResolver, TimezoneSource,
};
pub use timezone::{format_in_timezone, to_local, TieredTimezoneResolver, ZoneCatalog};
