//! PatternCacheManager: segmented cache with tag-based invalidation.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use dashmap::DashSet;
use pulse_core::config::{CacheConfig, InvalidationStrategy};
use pulse_core::errors::{CacheError, PulseResult};
use pulse_core::events::{CacheInvalidatedEvent, EventDispatcher, HandlerId};
use pulse_core::models::{AlertSeverity, PatternAlert, PatternUpdateResult, RealTimeRecommendation};
use pulse_core::tags;
use pulse_core::traits::Clock;
use pulse_core::SuccessPattern;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::entry::{CacheEntry, CachePriority};
use crate::handler::CacheInvalidationHandler;
use crate::query::query_key;
use crate::segment::{Lookup, Segment, SegmentKind};
use crate::stats::{CacheCounters, CacheStats};

pub struct PatternCacheManager {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    events: Arc<EventDispatcher>,
    patterns: Segment<SuccessPattern>,
    alerts: Segment<Vec<PatternAlert>>,
    recommendations: Segment<Vec<RealTimeRecommendation>>,
    queries: Segment<serde_json::Value>,
    counters: Arc<CacheCounters>,
    /// Keys waiting for the next batch flush.
    pending_batch: Mutex<BTreeSet<String>>,
    /// Keys the next `get` must treat as invalid.
    pending_lazy: DashSet<String>,
    pub(crate) batch_notify: Notify,
    pub(crate) maintenance: Mutex<Option<JoinHandle<()>>>,
    handler_id: Mutex<Option<HandlerId>>,
    disposed: AtomicBool,
}

impl PatternCacheManager {
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>, events: Arc<EventDispatcher>) -> Self {
        let counters = Arc::new(CacheCounters::default());
        let max = config.max_entries;
        Self {
            patterns: Segment::new(
                SegmentKind::Patterns,
                SegmentKind::Patterns.capacity(max),
                Arc::clone(&counters),
            ),
            alerts: Segment::new(
                SegmentKind::Alerts,
                SegmentKind::Alerts.capacity(max),
                Arc::clone(&counters),
            ),
            recommendations: Segment::new(
                SegmentKind::Recommendations,
                SegmentKind::Recommendations.capacity(max),
                Arc::clone(&counters),
            ),
            queries: Segment::new(
                SegmentKind::Queries,
                SegmentKind::Queries.capacity(max),
                Arc::clone(&counters),
            ),
            config,
            clock,
            events,
            counters,
            pending_batch: Mutex::new(BTreeSet::new()),
            pending_lazy: DashSet::new(),
            batch_notify: Notify::new(),
            maintenance: Mutex::new(None),
            handler_id: Mutex::new(None),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Subscribe to `patterns_updated` on the shared dispatcher. The handler
    /// holds a weak reference, so the subscription never keeps the manager alive.
    pub fn attach(self: &Arc<Self>) {
        let handler = Arc::new(CacheInvalidationHandler::new(Arc::downgrade(self)));
        let id = self.events.register(handler);
        if let Some(previous) = self
            .handler_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(id)
        {
            self.events.unregister(previous);
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    fn ensure_live(&self) -> PulseResult<()> {
        if self.is_disposed() {
            return Err(CacheError::Disposed.into());
        }
        Ok(())
    }

    // ── patterns ──

    pub fn cache_pattern(&self, pattern: &SuccessPattern) -> PulseResult<()> {
        self.ensure_live()?;
        let key = tags::pattern_key(&pattern.id);
        let priority = if pattern.confidence_score >= pulse_core::constants::HIGH_CONFIDENCE {
            CachePriority::High
        } else {
            CachePriority::Normal
        };
        let entry = CacheEntry::new(
            key.clone(),
            pattern.clone(),
            self.config.pattern_ttl(),
            pattern.tags(),
            priority,
            self.clock.now(),
        )?;
        self.pending_lazy.remove(&key);
        self.patterns.insert(entry);
        tracing::debug!(pattern_id = %pattern.id, "cached pattern");
        Ok(())
    }

    pub fn get_pattern(&self, pattern_id: &str) -> Option<SuccessPattern> {
        self.get(&self.patterns, &tags::pattern_key(pattern_id))
    }

    /// Entry metadata (access count, size, priority) for a cached pattern.
    pub fn pattern_entry(&self, pattern_id: &str) -> Option<Arc<CacheEntry<SuccessPattern>>> {
        self.patterns.entry(&tags::pattern_key(pattern_id))
    }

    // ── alerts ──

    pub fn cache_alerts(&self, client_id: &str, alerts: Vec<PatternAlert>) -> PulseResult<()> {
        self.ensure_live()?;
        let key = tags::alerts_key(client_id);
        let priority = if alerts.iter().any(|a| a.severity == AlertSeverity::Critical) {
            CachePriority::Critical
        } else {
            CachePriority::High
        };
        let mut entry_tags = vec![tags::client_tag(client_id)];
        entry_tags.extend(
            alerts
                .iter()
                .flat_map(|a| a.pattern_ids.iter().map(|id| tags::pattern_tag(id))),
        );
        let entry = CacheEntry::new(
            key.clone(),
            alerts,
            self.config.alert_ttl(),
            entry_tags,
            priority,
            self.clock.now(),
        )?;
        self.pending_lazy.remove(&key);
        self.alerts.insert(entry);
        Ok(())
    }

    pub fn get_alerts(&self, client_id: &str) -> Option<Vec<PatternAlert>> {
        self.get(&self.alerts, &tags::alerts_key(client_id))
    }

    // ── recommendations ──

    pub fn cache_recommendations(
        &self,
        client_id: &str,
        recommendations: Vec<RealTimeRecommendation>,
    ) -> PulseResult<()> {
        self.ensure_live()?;
        let key = tags::recommendations_key(client_id);
        let mut entry_tags = vec![tags::client_tag(client_id)];
        entry_tags.extend(
            recommendations
                .iter()
                .flat_map(|r| r.based_on_patterns.iter().map(|id| tags::pattern_tag(id))),
        );
        let entry = CacheEntry::new(
            key.clone(),
            recommendations,
            self.config.recommendation_ttl(),
            entry_tags,
            CachePriority::Normal,
            self.clock.now(),
        )?;
        self.pending_lazy.remove(&key);
        self.recommendations.insert(entry);
        Ok(())
    }

    pub fn get_recommendations(&self, client_id: &str) -> Option<Vec<RealTimeRecommendation>> {
        self.get(&self.recommendations, &tags::recommendations_key(client_id))
    }

    // ── query results ──

    /// Cache a query result; returns the derived key.
    pub fn cache_query_result(
        &self,
        query: &str,
        params: &serde_json::Value,
        result: serde_json::Value,
        result_tags: impl IntoIterator<Item = String>,
    ) -> PulseResult<String> {
        self.ensure_live()?;
        let key = query_key(query, params)?;
        let entry = CacheEntry::new(
            key.clone(),
            result,
            self.config.query_ttl(),
            result_tags,
            CachePriority::Low,
            self.clock.now(),
        )?;
        self.pending_lazy.remove(&key);
        self.queries.insert(entry);
        Ok(key)
    }

    pub fn get_query_result(&self, query: &str, params: &serde_json::Value) -> Option<serde_json::Value> {
        let key = query_key(query, params).ok()?;
        self.get(&self.queries, &key)
    }

    fn get<T: Clone + Send + Sync + 'static>(&self, segment: &Segment<T>, key: &str) -> Option<T> {
        if self.is_disposed() {
            return None;
        }
        if self.pending_lazy.remove(key).is_some() && segment.remove(key) {
            CacheCounters::add(&self.counters.invalidations, 1);
            CacheCounters::add(&self.counters.misses, 1);
            tracing::trace!(key, segment = segment.kind().name(), "lazy invalidation on read");
            return None;
        }
        match segment.lookup(key, self.clock.now()) {
            Lookup::Hit(value) => {
                CacheCounters::add(&self.counters.hits, 1);
                Some(value)
            }
            Lookup::Expired => {
                CacheCounters::add(&self.counters.expirations, 1);
                CacheCounters::add(&self.counters.misses, 1);
                None
            }
            Lookup::Miss => {
                CacheCounters::add(&self.counters.misses, 1);
                None
            }
        }
    }

    // ── invalidation ──

    /// Remove one key from whichever segment holds it.
    fn remove_key(&self, key: &str) -> bool {
        self.patterns.remove(key)
            | self.alerts.remove(key)
            | self.recommendations.remove(key)
            | self.queries.remove(key)
    }

    fn remove_keys<'a>(&self, keys: impl IntoIterator<Item = &'a String>) -> usize {
        let removed = keys.into_iter().filter(|k| self.remove_key(k)).count();
        CacheCounters::add(&self.counters.invalidations, removed as u64);
        removed
    }

    /// Remove every entry, in any segment, carrying at least one of `tags`.
    pub fn invalidate_by_tags<S: AsRef<str>>(&self, tags: &[S]) -> usize {
        let wanted: BTreeSet<String> = tags.iter().map(|t| t.as_ref().to_string()).collect();
        if wanted.is_empty() {
            return 0;
        }
        let mut keys = Vec::new();
        keys.extend(self.patterns.keys_with_any_tag(&wanted));
        keys.extend(self.alerts.keys_with_any_tag(&wanted));
        keys.extend(self.recommendations.keys_with_any_tag(&wanted));
        keys.extend(self.queries.keys_with_any_tag(&wanted));
        let removed = self.remove_keys(&keys);
        if removed > 0 {
            tracing::debug!(removed, tags = ?wanted, "invalidated by tags");
            self.events.emit_cache_invalidated(&CacheInvalidatedEvent {
                keys,
                strategy: "tags".to_string(),
            });
        }
        removed
    }

    /// Keys affected by a pattern update: the patterns themselves, the alert
    /// and recommendation lists of affected clients, and every query result
    /// whose tags intersect the update's tags.
    pub fn keys_for_update(&self, update: &PatternUpdateResult) -> BTreeSet<String> {
        let mut keys: BTreeSet<String> =
            update.patterns().map(|p| tags::pattern_key(&p.id)).collect();
        for client in &update.affected_clients {
            keys.insert(tags::alerts_key(client));
            keys.insert(tags::recommendations_key(client));
        }
        keys.extend(self.queries.keys_with_any_tag(&update.all_tags()));
        keys
    }

    /// Apply the configured strategy to every key derived from `update`.
    /// Returns the number of keys scheduled or removed.
    pub fn invalidate_on_pattern_update(&self, update: &PatternUpdateResult) -> usize {
        let nothing_changed = update.is_empty()
            && update.affected_clients.is_empty()
            && update.affected_tags.is_empty();
        if self.is_disposed() || nothing_changed {
            return 0;
        }
        let keys = self.keys_for_update(update);
        let strategy = self.config.invalidation_strategy;
        match strategy {
            InvalidationStrategy::Immediate => {
                let removed = self.remove_keys(&keys);
                tracing::info!(keys = keys.len(), removed, "immediate invalidation");
            }
            InvalidationStrategy::Batch => {
                let queued = {
                    let mut pending = self
                        .pending_batch
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner);
                    pending.extend(keys.iter().cloned());
                    pending.len()
                };
                self.batch_notify.notify_one();
                tracing::debug!(queued, "batched invalidation");
            }
            InvalidationStrategy::Lazy => {
                for key in &keys {
                    self.pending_lazy.insert(key.clone());
                }
                tracing::debug!(keys = keys.len(), "lazy invalidation scheduled");
            }
        }
        let count = keys.len();
        self.events.emit_cache_invalidated(&CacheInvalidatedEvent {
            keys: keys.into_iter().collect(),
            strategy: strategy.name().to_string(),
        });
        count
    }

    /// Apply every batched invalidation now.
    pub fn flush_pending(&self) -> usize {
        let keys = std::mem::take(
            &mut *self
                .pending_batch
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        if keys.is_empty() {
            return 0;
        }
        let removed = self.remove_keys(&keys);
        tracing::info!(keys = keys.len(), removed, "flushed batched invalidations");
        removed
    }

    pub fn pending_invalidations(&self) -> usize {
        self.pending_batch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
            + self.pending_lazy.len()
    }

    /// Sweep every segment for entries expired at the clock's current time.
    pub fn cleanup_expired(&self) -> u64 {
        let now = self.clock.now();
        let removed = self.patterns.remove_expired(now)
            + self.alerts.remove_expired(now)
            + self.recommendations.remove_expired(now)
            + self.queries.remove_expired(now);
        if removed > 0 {
            CacheCounters::add(&self.counters.expirations, removed);
            tracing::debug!(removed, "expired entries swept");
        }
        removed
    }

    /// Drive moka's deferred maintenance (eviction listeners, size bookkeeping).
    pub fn run_pending_tasks(&self) {
        self.patterns.run_pending_tasks();
        self.alerts.run_pending_tasks();
        self.recommendations.run_pending_tasks();
        self.queries.run_pending_tasks();
    }

    /// Live entries and summed entry sizes for one segment.
    pub fn segment_usage(&self, kind: SegmentKind) -> (u64, u64) {
        match kind {
            SegmentKind::Patterns => self.patterns.usage(),
            SegmentKind::Alerts => self.alerts.usage(),
            SegmentKind::Recommendations => self.recommendations.usage(),
            SegmentKind::Queries => self.queries.usage(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        let hits = CacheCounters::get(&self.counters.hits);
        let misses = CacheCounters::get(&self.counters.misses);
        let mut stats = CacheStats {
            hits,
            misses,
            hit_rate: CacheStats::hit_rate(hits, misses),
            evictions: CacheCounters::get(&self.counters.evictions),
            expirations: CacheCounters::get(&self.counters.expirations),
            invalidations: CacheCounters::get(&self.counters.invalidations),
            pending_invalidations: self.pending_invalidations(),
            ..CacheStats::default()
        };
        for kind in SegmentKind::ALL {
            let (entries, bytes) = self.segment_usage(kind);
            match kind {
                SegmentKind::Patterns => stats.pattern_entries = entries,
                SegmentKind::Alerts => stats.alert_entries = entries,
                SegmentKind::Recommendations => stats.recommendation_entries = entries,
                SegmentKind::Queries => stats.query_entries = entries,
            }
            stats.total_entries += entries;
            stats.estimated_bytes += bytes;
        }
        stats
    }

    /// Empty every segment and pending set. Counters are kept.
    pub fn clear(&self) {
        self.patterns.clear();
        self.alerts.clear();
        self.recommendations.clear();
        self.queries.clear();
        self.pending_batch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.pending_lazy.clear();
    }

    pub fn reset_stats(&self) {
        self.counters.reset();
    }

    /// Stop maintenance, drop all entries, and detach from the dispatcher.
    /// Further `cache_*` calls fail with `CacheError::Disposed`.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(task) = self
            .maintenance
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
        if let Some(id) = self
            .handler_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            self.events.unregister(id);
        }
        self.clear();
        tracing::info!("pattern cache disposed");
    }

    pub(crate) fn downgrade(self: &Arc<Self>) -> Weak<Self> {
        Arc::downgrade(self)
    }
}

impl Drop for PatternCacheManager {
    fn drop(&mut self) {
        if let Some(task) = self
            .maintenance
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
    }
}
