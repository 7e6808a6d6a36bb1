use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hit rate below which the cache counts as degraded, once warmed up.
const LOW_HIT_RATE: f64 = 0.3;
/// Lookups needed before the hit rate means anything.
const HIT_RATE_WARMUP: u64 = 100;
/// Pending invalidations above which the batch window looks stuck.
const PENDING_BACKLOG: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// One finding from the health checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthIssue {
    pub subsystem: String,
    pub status: HealthStatus,
    pub message: String,
}

/// Point-in-time view of the engine, assembled by the runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    /// Engine version that produced the snapshot.
    pub version: String,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_hit_rate: f64,
    pub cache_entries: u64,
    pub cache_evictions: u64,
    pub pending_invalidations: usize,
    pub maintenance_running: bool,
    pub cache_disposed: bool,
    pub active_patterns: usize,
    /// Patterns with confidence history in the dynamic updater.
    pub tracked_patterns: usize,
    pub active_journeys: usize,
    pub event_handlers: usize,
    pub taken_at: Option<DateTime<Utc>>,
}

impl HealthSnapshot {
    pub fn issues(&self) -> Vec<HealthIssue> {
        let mut issues = Vec::new();
        if self.cache_disposed {
            issues.push(issue("cache", HealthStatus::Unhealthy, "cache manager has been disposed".into()));
        } else if self.cache_hits + self.cache_misses >= HIT_RATE_WARMUP && self.cache_hit_rate < LOW_HIT_RATE {
            issues.push(issue(
                "cache",
                HealthStatus::Degraded,
                format!("cache hit rate is {:.0}%", self.cache_hit_rate * 100.0),
            ));
        }
        if self.pending_invalidations > PENDING_BACKLOG {
            issues.push(issue(
                "invalidation",
                HealthStatus::Degraded,
                format!("{} invalidations pending", self.pending_invalidations),
            ));
        }
        issues
    }

    /// Worst status across all issues.
    pub fn status(&self) -> HealthStatus {
        self.issues()
            .iter()
            .map(|i| i.status)
            .fold(HealthStatus::Healthy, |worst, s| match (worst, s) {
                (HealthStatus::Unhealthy, _) | (_, HealthStatus::Unhealthy) => HealthStatus::Unhealthy,
                (HealthStatus::Degraded, _) | (_, HealthStatus::Degraded) => HealthStatus::Degraded,
                _ => HealthStatus::Healthy,
            })
    }

    pub fn is_healthy(&self) -> bool {
        self.status() == HealthStatus::Healthy
    }
}

fn issue(subsystem: &str, status: HealthStatus, message: String) -> HealthIssue {
    HealthIssue {
        subsystem: subsystem.to_string(),
        status,
        message,
    }
}
