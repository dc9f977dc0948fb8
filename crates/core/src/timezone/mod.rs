//! Timezone resolution and local-time rendering

pub mod catalog;
pub mod format;
pub mod ports;
pub mod resolver;

pub use catalog::{ZoneCatalog, ZoneMatch};
pub use format::{format_in_timezone, parse_zone, to_local};
pub use resolver::TieredTimezoneResolver;
