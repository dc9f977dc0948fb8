//! Wiring of the shift service from configuration

use std::sync::Arc;
use std::time::Duration;

use shiftclock_core::{ShiftService, TieredTimezoneResolver, ZoneCatalog};
use shiftclock_domain::{Config, Result};
use tracing::info;

use crate::database::{DbManager, SqliteShiftRepository};
use crate::integrations::timezonedb::TimezoneDbClient;

/// Running application components
pub struct AppContext {
    pub db: Arc<DbManager>,
    pub service: Arc<ShiftService>,
}

/// Open the store, apply the schema and assemble the shift service.
///
/// The external lookup tier is attached only when an API key is configured.
pub fn build(config: &Config) -> Result<AppContext> {
    let db = Arc::new(DbManager::from_config(&config.database)?);
    db.run_migrations()?;

    let repository = Arc::new(SqliteShiftRepository::new(db.clone()));
    let resolver = Arc::new(build_resolver(config)?);
    let service = ShiftService::new(repository, resolver)
        .with_default_page_size(config.shifts.default_page_size);

    info!(db_path = %db.path().display(), "shift service ready");
    Ok(AppContext { db, service: Arc::new(service) })
}

/// Catalog tier bounded by `max_match_distance_km`, plus TimezoneDB when keyed.
pub fn build_resolver(config: &Config) -> Result<TieredTimezoneResolver> {
    let catalog =
        ZoneCatalog::builtin().with_max_distance_km(config.timezone.max_match_distance_km);
    let resolver = TieredTimezoneResolver::new(catalog);

    match TimezoneDbClient::from_config(&config.timezone)? {
        Some(client) => {
            info!("timezonedb lookup enabled");
            let timeout = Duration::from_millis(config.timezone.timeout_ms.max(1));
            Ok(resolver.with_lookup(Arc::new(client), timeout))
        }
        None => {
            info!("no timezone API key configured; catalog and UTC fallback only");
            Ok(resolver)
        }
    }
}
