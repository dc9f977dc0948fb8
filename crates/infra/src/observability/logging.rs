//! Tracing subscriber setup

use shiftclock_domain::LoggingConfig;
use tracing_subscriber::EnvFilter;

const FALLBACK_DIRECTIVE: &str = "info";

/// Filter for the subscriber. `RUST_LOG` wins over the configured level; an
/// unparseable level falls back to `info`.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE))
}

/// Install the global subscriber (plain text or JSON lines).
///
/// Returns `false` when a global subscriber was already installed, which
/// leaves the existing one in place.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let builder = tracing_subscriber::fmt().with_env_filter(build_filter(config)).with_target(true);

    let installed =
        if config.json { builder.json().try_init().is_ok() } else { builder.try_init().is_ok() };

    if installed {
        tracing::debug!(level = %config.level, json = config.json, "tracing initialised");
    }
    installed
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    #[test]
    fn configured_level_used_without_rust_log() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        std::env::remove_var("RUST_LOG");

        let config = LoggingConfig { level: "shiftclock_core=debug".into(), json: false };
        assert_eq!(build_filter(&config).to_string(), "shiftclock_core=debug");
    }

    #[test]
    fn invalid_level_falls_back_to_info() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        std::env::remove_var("RUST_LOG");

        let config = LoggingConfig { level: "shiftclock=loudest".into(), json: false };
        assert_eq!(build_filter(&config).to_string(), "info");
    }

    #[test]
    fn rust_log_overrides_config() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        std::env::set_var("RUST_LOG", "warn");

        let filter = build_filter(&LoggingConfig::default());
        std::env::remove_var("RUST_LOG");
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn second_init_is_a_no_op() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        let config = LoggingConfig::default();
        init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
