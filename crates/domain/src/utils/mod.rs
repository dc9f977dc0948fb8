//! Domain utilities

pub mod geo;
