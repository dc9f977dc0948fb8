//! # ShiftClock Domain
//!
//! Business domain types and models for shift clock-in/out.
//!
//! This crate contains:
//! - Shift records, geofences, clock events and the derived shift state
//! - Request DTOs with boundary validation
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants and the great-circle distance utility
//!
//! ## Architecture
//! - No dependencies on other ShiftClock crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::geo::distance_meters;
