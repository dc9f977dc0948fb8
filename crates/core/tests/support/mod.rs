//! Shared test helpers for `shiftclock-core` integration tests.
//!
//! In-memory stand-ins for the store and timezone ports plus request
//! fixtures, so lifecycle tests can focus on behaviour instead of wiring.

#![allow(dead_code)]

pub mod fixtures;
pub mod repositories;
pub mod timezones;
