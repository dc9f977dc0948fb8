//! Configuration loading
//!
//! Loads the application [`Config`](shiftclock_domain::Config) from
//! environment variables and files.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, discover_config_path};
