//! EventDispatcher: synchronous fan-out to registered handlers.
//!
//! Delivery semantics: in registration order, at most once per handler,
//! on the emitting thread. The handler list is snapshotted before delivery,
//! so a handler may emit or (un)register without deadlocking.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::handler::PatternEventHandler;
use super::types::*;

/// Registration handle returned by [`EventDispatcher::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Registered = (HandlerId, Arc<dyn PatternEventHandler>);

pub struct EventDispatcher {
    handlers: RwLock<Vec<Registered>>,
    next_id: AtomicU64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a handler; keep the id to detach it later.
    pub fn register(&self, handler: Arc<dyn PatternEventHandler>) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, handler));
        id
    }

    /// Detach a handler. Returns false if it was not registered.
    pub fn unregister(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let before = handlers.len();
        handlers.retain(|(hid, _)| *hid != id);
        handlers.len() != before
    }

    /// Detach every handler.
    pub fn clear(&self) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn handler_count(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Handlers that panic are caught and logged; later handlers still receive the event.
    fn emit<F: Fn(&dyn PatternEventHandler)>(&self, event_name: &'static str, f: F) {
        let snapshot: Vec<Registered> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for (id, handler) in &snapshot {
            let result = catch_unwind(AssertUnwindSafe(|| f(handler.as_ref())));
            if result.is_err() {
                tracing::error!(event = event_name, handler = id.0, "event handler panicked");
            }
        }
    }

    pub fn emit_pattern_discovered(&self, event: &PatternDiscoveredEvent) {
        self.emit("pattern_discovered", |h| h.on_pattern_discovered(event));
    }

    pub fn emit_confidence_updated(&self, event: &ConfidenceUpdatedEvent) {
        self.emit("confidence_updated", |h| h.on_confidence_updated(event));
    }

    pub fn emit_patterns_updated(&self, event: &PatternsUpdatedEvent) {
        self.emit("patterns_updated", |h| h.on_patterns_updated(event));
    }

    pub fn emit_recommendations_generated(&self, event: &RecommendationsGeneratedEvent) {
        self.emit("recommendations_generated", |h| h.on_recommendations_generated(event));
    }

    pub fn emit_cache_invalidated(&self, event: &CacheInvalidatedEvent) {
        self.emit("cache_invalidated", |h| h.on_cache_invalidated(event));
    }

    pub fn emit_analysis_failed(&self, event: &AnalysisFailedEvent) {
        self.emit("analysis_failed", |h| h.on_analysis_failed(event));
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
