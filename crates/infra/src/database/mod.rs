//! SQLite persistence

pub mod manager;
pub mod shift_repository;

pub use manager::{DbConnection, DbManager};
pub use shift_repository::SqliteShiftRepository;
