//! One LRU segment: a moka cache of `Arc<CacheEntry<T>>` with per-entry expiry.
//!
//! moka records reads and writes in buffers and applies them, including
//! evictions, during housekeeping. Every insert and lookup drains those
//! buffers before returning so the recency order and the capacity bound hold
//! at each call boundary.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use moka::notification::RemovalCause;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use moka::Expiry;

use crate::entry::CacheEntry;
use crate::stats::CacheCounters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Patterns,
    Alerts,
    Recommendations,
    Queries,
}

impl SegmentKind {
    pub const ALL: [SegmentKind; 4] = [
        Self::Patterns,
        Self::Alerts,
        Self::Recommendations,
        Self::Queries,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Patterns => "patterns",
            Self::Alerts => "alerts",
            Self::Recommendations => "recommendations",
            Self::Queries => "queries",
        }
    }

    /// Share of the total entry budget.
    pub fn share(self) -> f64 {
        use pulse_core::constants::*;
        match self {
            Self::Patterns => PATTERN_SEGMENT_SHARE,
            Self::Alerts => ALERT_SEGMENT_SHARE,
            Self::Recommendations => RECOMMENDATION_SEGMENT_SHARE,
            Self::Queries => QUERY_SEGMENT_SHARE,
        }
    }

    /// Capacity for this segment out of `max_entries`, never below 1.
    pub fn capacity(self, max_entries: u64) -> u64 {
        ((max_entries as f64 * self.share()).floor() as u64).max(1)
    }
}

/// Wall-clock backstop so entries nobody reads still leave memory.
struct EntryExpiry;

impl<T> Expiry<String, Arc<CacheEntry<T>>> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Arc<CacheEntry<T>>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Arc<CacheEntry<T>>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

pub(crate) enum Lookup<T> {
    Hit(T),
    Expired,
    Miss,
}

pub(crate) struct Segment<T: Clone + Send + Sync + 'static> {
    kind: SegmentKind,
    cache: Cache<String, Arc<CacheEntry<T>>>,
}

impl<T: Clone + Send + Sync + 'static> Segment<T> {
    pub fn new(kind: SegmentKind, capacity: u64, counters: Arc<CacheCounters>) -> Self {
        let cache = Cache::builder()
            .name(kind.name())
            .max_capacity(capacity)
            .eviction_policy(EvictionPolicy::lru())
            .expire_after(EntryExpiry)
            .eviction_listener(
                move |_key: Arc<String>, _value: Arc<CacheEntry<T>>, cause: RemovalCause| match cause
                {
                    RemovalCause::Size => CacheCounters::add(&counters.evictions, 1),
                    RemovalCause::Expired => CacheCounters::add(&counters.expirations, 1),
                    _ => {}
                },
            )
            .build();
        Self { kind, cache }
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn insert(&self, entry: CacheEntry<T>) {
        self.cache.insert(entry.key.clone(), Arc::new(entry));
        self.cache.run_pending_tasks();
    }

    /// Expired entries are removed on sight.
    pub fn lookup(&self, key: &str, now: DateTime<Utc>) -> Lookup<T> {
        let found = self.cache.get(key);
        let lookup = match found {
            Some(entry) if entry.is_expired(now) => {
                self.cache.invalidate(key);
                Lookup::Expired
            }
            Some(entry) => {
                entry.touch(now);
                Lookup::Hit(entry.value.clone())
            }
            None => return Lookup::Miss,
        };
        self.cache.run_pending_tasks();
        lookup
    }

    pub fn entry(&self, key: &str) -> Option<Arc<CacheEntry<T>>> {
        self.cache.get(key)
    }

    pub fn remove(&self, key: &str) -> bool {
        self.cache.remove(key).is_some()
    }

    pub fn keys_with_any_tag(&self, tags: &BTreeSet<String>) -> Vec<String> {
        self.cache
            .iter()
            .filter(|(_, entry)| entry.has_any_tag(tags))
            .map(|(key, _)| key.as_ref().clone())
            .collect()
    }

    /// Removes every entry expired at `now`; returns how many.
    pub fn remove_expired(&self, now: DateTime<Utc>) -> u64 {
        let expired: Vec<Arc<String>> = self
            .cache
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key)
            .collect();
        expired
            .iter()
            .filter(|key| self.cache.remove(key.as_str()).is_some())
            .count() as u64
    }

    /// Live entry count and summed entry sizes.
    pub fn usage(&self) -> (u64, u64) {
        self.cache
            .iter()
            .fold((0, 0), |(n, bytes), (_, entry)| (n + 1, bytes + entry.size as u64))
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
    }

    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}
