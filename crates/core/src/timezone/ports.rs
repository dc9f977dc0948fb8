//! Port interfaces for timezone resolution
//!
//! The lifecycle manager only ever sees [`TimezoneResolver`], which cannot
//! fail. [`TimezoneLookup`] is the optional external tier behind it and is
//! free to fail; the resolver absorbs those failures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shiftclock_domain::{Coordinate, Result};

/// Which tier produced a resolved zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimezoneSource {
    /// Local heuristic over the zone catalog
    Catalog,
    /// External lookup service
    Lookup,
    /// Nothing matched; fixed UTC fallback
    Fallback,
}

/// Outcome of a timezone resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTimezone {
    pub zone: String,
    pub source: TimezoneSource,
}

/// Maps a coordinate to an IANA timezone identifier. Never fails.
#[async_trait]
pub trait TimezoneResolver: Send + Sync {
    async fn resolve_timezone(&self, coordinate: Coordinate) -> ResolvedTimezone;
}

/// External coordinate-to-zone lookup
#[async_trait]
pub trait TimezoneLookup: Send + Sync {
    /// `Ok(None)` means the service answered without a zone; `Err` is a
    /// transport or decoding failure.
    async fn lookup_timezone(&self, coordinate: Coordinate) -> Result<Option<String>>;
}
