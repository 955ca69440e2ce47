//! Structured logging for the terrain engine via the `tracing` ecosystem.
//!
//! Console output with uptime timestamps and module paths, filterable per
//! subsystem through `RUST_LOG` or the configuration's log level override.

use mesa_config::TerrainConfig;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber for the engine.
///
/// The filter is resolved in order: `RUST_LOG` environment variable, then
/// the config's `debug.log_level` when non-empty, then `info`.
pub fn init_logging(config: Option<&TerrainConfig>) {
    let filter_str = config
        .map(|c| c.debug.log_level.as_str())
        .filter(|level| !level.is_empty())
        .unwrap_or("info");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true) // generation workers are named
        .with_level(true)
        .with_timer(fmt::time::uptime());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

/// The default filter used when neither `RUST_LOG` nor the config supplies one.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new("info")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_is_info() {
        let filter = default_env_filter();
        assert!(format!("{}", filter).contains("info"));
    }

    #[test]
    fn test_subsystem_filters_parse() {
        let valid = [
            "info",
            "debug,mesa_stream=trace",
            "warn,mesa_terrain=debug",
            "error",
        ];
        for filter_str in &valid {
            assert!(
                EnvFilter::try_new(filter_str).is_ok(),
                "failed to parse filter: {filter_str}"
            );
        }
    }

    #[test]
    fn test_config_override_is_used_when_non_empty() {
        let mut config = TerrainConfig::default();
        config.debug.log_level = "debug".to_string();
        let level = config.debug.log_level.as_str();
        assert!(EnvFilter::try_new(level).is_ok());
    }
}
