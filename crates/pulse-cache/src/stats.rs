//! Cache counters and the stats snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Shared counters. Segments' eviction listeners bump `evictions` and
/// `expirations`; the manager bumps the rest.
#[derive(Debug, Default)]
pub(crate) struct CacheCounters {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub evictions: AtomicU64,
    pub expirations: AtomicU64,
    pub invalidations: AtomicU64,
}

impl CacheCounters {
    pub fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        for c in [
            &self.hits,
            &self.misses,
            &self.evictions,
            &self.expirations,
            &self.invalidations,
        ] {
            c.store(0, Ordering::Relaxed);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub evictions: u64,
    pub expirations: u64,
    pub invalidations: u64,
    pub pattern_entries: u64,
    pub alert_entries: u64,
    pub recommendation_entries: u64,
    pub query_entries: u64,
    pub total_entries: u64,
    /// Sum of serialized entry sizes.
    pub estimated_bytes: u64,
    pub pending_invalidations: usize,
}

impl CacheStats {
    pub(crate) fn hit_rate(hits: u64, misses: u64) -> f64 {
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}
