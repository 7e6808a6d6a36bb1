//! Tracing setup: `EnvFilter` from `PULSE_LOG`, human or JSON output.

pub mod spans;

use std::sync::Once;

use pulse_core::config::ObservabilityConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding a full filter directive, e.g.
/// `PULSE_LOG=pulse_cache=debug,pulse_detection=info`.
pub const LOG_ENV: &str = "PULSE_LOG";

/// Build the filter: `PULSE_LOG` when set and valid, else the configured level.
pub fn build_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// Idempotent. If another subscriber is already installed (an embedding
/// application, a test harness) this leaves it in place.
pub fn init_tracing(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let json = config.json_logs;
        let result = tracing_subscriber::registry()
            .with(build_filter(config))
            .with(json.then(|| fmt::layer().json().with_target(true).with_thread_ids(true)))
            .with((!json).then(|| {
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
            }))
            .try_init();
        if result.is_ok() {
            tracing::debug!(level = %config.log_level, json, "tracing initialized");
        }
    });
}
