//! Three-tier timezone resolution
//!
//! 1. Local catalog heuristic (no I/O)
//! 2. External lookup, when one is configured, bounded by a timeout
//! 3. Fixed `UTC` fallback
//!
//! Every failure in a tier degrades to the next one; resolution itself never
//! fails.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shiftclock_domain::constants::{DEFAULT_TIMEZONE_LOOKUP_TIMEOUT_MS, FALLBACK_TIMEZONE};
use shiftclock_domain::Coordinate;
use tracing::{debug, warn};

use super::catalog::ZoneCatalog;
use super::format::parse_zone;
use super::ports::{ResolvedTimezone, TimezoneLookup, TimezoneResolver, TimezoneSource};

/// Catalog first, then the optional external lookup, then UTC.
pub struct TieredTimezoneResolver {
    catalog: ZoneCatalog,
    lookup: Option<Arc<dyn TimezoneLookup>>,
    lookup_timeout: Duration,
}

impl TieredTimezoneResolver {
    /// Resolver with only the local tier and the fallback.
    pub fn new(catalog: ZoneCatalog) -> Self {
        Self {
            catalog,
            lookup: None,
            lookup_timeout: Duration::from_millis(DEFAULT_TIMEZONE_LOOKUP_TIMEOUT_MS),
        }
    }

    /// Enable the external lookup tier.
    pub fn with_lookup(mut self, lookup: Arc<dyn TimezoneLookup>, timeout: Duration) -> Self {
        self.lookup = Some(lookup);
        self.lookup_timeout = timeout;
        self
    }

    pub fn has_lookup(&self) -> bool {
        self.lookup.is_some()
    }

    async fn lookup_tier(&self, lookup: &dyn TimezoneLookup, coordinate: Coordinate) -> Option<String> {
        let outcome = tokio::time::timeout(self.lookup_timeout, lookup.lookup_timezone(coordinate)).await;

        match outcome {
            Ok(Ok(Some(zone))) => {
                if parse_zone(&zone).is_some() {
                    Some(zone.trim().to_string())
                } else {
                    warn!(zone = %zone, "timezone lookup returned an unknown zone");
                    None
                }
            }
            Ok(Ok(None)) => {
                debug!(
                    latitude = coordinate.latitude,
                    longitude = coordinate.longitude,
                    "timezone lookup had no answer"
                );
                None
            }
            Ok(Err(err)) => {
                warn!(error = %err, "timezone lookup failed");
                None
            }
            Err(_) => {
                warn!(timeout_ms = self.lookup_timeout.as_millis() as u64, "timezone lookup timed out");
                None
            }
        }
    }
}

impl Default for TieredTimezoneResolver {
    fn default() -> Self {
        Self::new(ZoneCatalog::builtin())
    }
}

#[async_trait]
impl TimezoneResolver for TieredTimezoneResolver {
    async fn resolve_timezone(&self, coordinate: Coordinate) -> ResolvedTimezone {
        if let Some(found) = self.catalog.nearest(&coordinate) {
            debug!(
                zone = found.zone.name(),
                distance_meters = found.distance_meters,
                "timezone resolved from catalog"
            );
            return ResolvedTimezone {
                zone: found.zone.name().to_string(),
                source: TimezoneSource::Catalog,
            };
        }

        if let Some(lookup) = &self.lookup {
            if let Some(zone) = self.lookup_tier(lookup.as_ref(), coordinate).await {
                debug!(zone = %zone, "timezone resolved from lookup");
                return ResolvedTimezone { zone, source: TimezoneSource::Lookup };
            }
        }

        warn!(
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "timezone resolution degraded to UTC"
        );
        ResolvedTimezone { zone: FALLBACK_TIMEZONE.to_string(), source: TimezoneSource::Fallback }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use shiftclock_domain::{Result, ShiftClockError};

    use super::*;

    enum Behaviour {
        Answer(&'static str),
        NoAnswer,
        Fail,
        Hang,
    }

    struct ScriptedLookup {
        behaviour: Behaviour,
        calls: AtomicUsize,
    }

    impl ScriptedLookup {
        fn new(behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self { behaviour, calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl TimezoneLookup for ScriptedLookup {
        async fn lookup_timezone(&self, _coordinate: Coordinate) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behaviour {
                Behaviour::Answer(zone) => Ok(Some(zone.to_string())),
                Behaviour::NoAnswer => Ok(None),
                Behaviour::Fail => Err(ShiftClockError::Network("connection refused".into())),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(Some("Europe/Paris".to_string()))
                }
            }
        }
    }

    fn point_nemo() -> Coordinate {
        Coordinate::new(-48.8767, -123.3933)
    }

    fn resolver_with(lookup: Arc<ScriptedLookup>) -> TieredTimezoneResolver {
        TieredTimezoneResolver::new(ZoneCatalog::builtin())
            .with_lookup(lookup, Duration::from_millis(50))
    }

    #[tokio::test]
    async fn catalog_hit_skips_lookup() {
        let lookup = ScriptedLookup::new(Behaviour::Answer("Europe/Paris"));
        let resolver = resolver_with(lookup.clone());

        let resolved = resolver.resolve_timezone(Coordinate::new(40.0, -75.0)).await;

        assert_eq!(resolved.zone, "America/New_York");
        assert_eq!(resolved.source, TimezoneSource::Catalog);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn catalog_miss_uses_lookup() {
        let lookup = ScriptedLookup::new(Behaviour::Answer("Pacific/Pitcairn"));
        let resolver = resolver_with(lookup.clone());

        let resolved = resolver.resolve_timezone(point_nemo()).await;

        assert_eq!(resolved.zone, "Pacific/Pitcairn");
        assert_eq!(resolved.source, TimezoneSource::Lookup);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn lookup_failures_degrade_to_utc() {
        for behaviour in
            [Behaviour::NoAnswer, Behaviour::Fail, Behaviour::Answer("Not/AZone"), Behaviour::Hang]
        {
            let resolver = resolver_with(ScriptedLookup::new(behaviour));
            let resolved = resolver.resolve_timezone(point_nemo()).await;
            assert_eq!(resolved.zone, "UTC");
            assert_eq!(resolved.source, TimezoneSource::Fallback);
        }
    }

    #[tokio::test]
    async fn no_lookup_configured_falls_back() {
        let resolver = TieredTimezoneResolver::new(ZoneCatalog::empty());
        assert!(!resolver.has_lookup());

        let resolved = resolver.resolve_timezone(Coordinate::new(40.0, -75.0)).await;
        assert_eq!(resolved, ResolvedTimezone { zone: "UTC".into(), source: TimezoneSource::Fallback });
    }
}
