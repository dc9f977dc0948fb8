//! External service integrations

pub mod timezonedb;
