//! Cache entry with access metadata.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use pulse_core::errors::{CacheError, PulseResult};
use serde::Serialize;

/// Recorded on every entry. Eviction is strict LRU and ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CachePriority {
    Low,
    Normal,
    High,
    Critical,
}

#[derive(Debug)]
pub struct CacheEntry<T> {
    pub key: String,
    pub value: T,
    pub created_at: DateTime<Utc>,
    pub ttl: Duration,
    pub tags: BTreeSet<String>,
    /// Serialized JSON size in bytes.
    pub size: usize,
    pub priority: CachePriority,
    last_accessed: Mutex<DateTime<Utc>>,
    access_count: AtomicU64,
}

impl<T: Serialize> CacheEntry<T> {
    pub fn new(
        key: String,
        value: T,
        ttl: Duration,
        tags: impl IntoIterator<Item = String>,
        priority: CachePriority,
        now: DateTime<Utc>,
    ) -> PulseResult<Self> {
        let size = serde_json::to_vec(&value)
            .map_err(|e| CacheError::Sizing {
                key: key.clone(),
                reason: e.to_string(),
            })?
            .len();
        Ok(Self {
            key,
            value,
            created_at: now,
            ttl,
            tags: tags.into_iter().collect(),
            size,
            priority,
            last_accessed: Mutex::new(now),
            access_count: AtomicU64::new(0),
        })
    }
}

impl<T> CacheEntry<T> {
    /// Expired once `now - created_at >= ttl`. A clock that moved backwards
    /// never expires an entry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match (now - self.created_at).to_std() {
            Ok(age) => age >= self.ttl,
            Err(_) => false,
        }
    }

    pub fn touch(&self, now: DateTime<Utc>) {
        self.access_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_accessed
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn access_count(&self) -> u64 {
        self.access_count.load(Ordering::Relaxed)
    }

    pub fn last_accessed(&self) -> DateTime<Utc> {
        *self
            .last_accessed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn has_any_tag(&self, tags: &BTreeSet<String>) -> bool {
        !self.tags.is_disjoint(tags)
    }
}
