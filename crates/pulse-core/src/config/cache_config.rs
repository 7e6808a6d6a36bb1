use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// How invalidations derived from a pattern update are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidationStrategy {
    /// Delete now.
    #[default]
    Immediate,
    /// Accumulate and flush after the batch window.
    Batch,
    /// Mark pending; the next `get` evicts.
    Lazy,
}

impl InvalidationStrategy {
    pub fn name(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Batch => "batch",
            Self::Lazy => "lazy",
        }
    }
}

impl fmt::Display for InvalidationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pattern cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Total entries across all four segments.
    pub max_entries: u64,
    pub pattern_ttl_secs: u64,
    pub alert_ttl_secs: u64,
    pub recommendation_ttl_secs: u64,
    pub query_ttl_secs: u64,
    pub invalidation_strategy: InvalidationStrategy,
    pub batch_window_ms: u64,
    pub cleanup_interval_secs: u64,
}

impl CacheConfig {
    pub fn pattern_ttl(&self) -> Duration {
        Duration::from_secs(self.pattern_ttl_secs)
    }

    pub fn alert_ttl(&self) -> Duration {
        Duration::from_secs(self.alert_ttl_secs)
    }

    pub fn recommendation_ttl(&self) -> Duration {
        Duration::from_secs(self.recommendation_ttl_secs)
    }

    pub fn query_ttl(&self) -> Duration {
        Duration::from_secs(self.query_ttl_secs)
    }

    pub fn batch_window(&self) -> Duration {
        Duration::from_millis(self.batch_window_ms)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: defaults::DEFAULT_CACHE_MAX_ENTRIES,
            pattern_ttl_secs: defaults::DEFAULT_PATTERN_TTL_SECS,
            alert_ttl_secs: defaults::DEFAULT_ALERT_TTL_SECS,
            recommendation_ttl_secs: defaults::DEFAULT_RECOMMENDATION_CACHE_TTL_SECS,
            query_ttl_secs: defaults::DEFAULT_QUERY_TTL_SECS,
            invalidation_strategy: InvalidationStrategy::default(),
            batch_window_ms: defaults::DEFAULT_BATCH_WINDOW_MS,
            cleanup_interval_secs: defaults::DEFAULT_CLEANUP_INTERVAL_SECS,
        }
    }
}
