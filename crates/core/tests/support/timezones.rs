//! Timezone test doubles

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shiftclock_core::{ResolvedTimezone, TimezoneLookup, TimezoneResolver, TimezoneSource};
use shiftclock_domain::{Coordinate, Result as DomainResult, ShiftClockError};

/// Resolver that always answers with the same zone and counts calls.
pub struct FixedResolver {
    zone: String,
    calls: AtomicUsize,
}

impl FixedResolver {
    pub fn new(zone: &str) -> Arc<Self> {
        Arc::new(Self { zone: zone.to_string(), calls: AtomicUsize::new(0) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TimezoneResolver for FixedResolver {
    async fn resolve_timezone(&self, _coordinate: Coordinate) -> ResolvedTimezone {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ResolvedTimezone { zone: self.zone.clone(), source: TimezoneSource::Catalog }
    }
}

/// Resolver that holds every call until [`GatedResolver::release`].
pub struct GatedResolver {
    zone: String,
    gate: tokio::sync::Notify,
}

impl GatedResolver {
    pub fn new(zone: &str) -> Arc<Self> {
        Arc::new(Self { zone: zone.to_string(), gate: tokio::sync::Notify::new() })
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl TimezoneResolver for GatedResolver {
    async fn resolve_timezone(&self, _coordinate: Coordinate) -> ResolvedTimezone {
        self.gate.notified().await;
        ResolvedTimezone { zone: self.zone.clone(), source: TimezoneSource::Catalog }
    }
}

/// External lookup that is always down.
pub struct UnavailableLookup;

#[async_trait]
impl TimezoneLookup for UnavailableLookup {
    async fn lookup_timezone(&self, _coordinate: Coordinate) -> DomainResult<Option<String>> {
        Err(ShiftClockError::Network("connection refused".into()))
    }
}

/// External lookup that never answers within any sensible timeout.
pub struct StalledLookup;

#[async_trait]
impl TimezoneLookup for StalledLookup {
    async fn lookup_timezone(&self, _coordinate: Coordinate) -> DomainResult<Option<String>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Some("Europe/Paris".to_string()))
    }
}
