//! Adapter that subscribes the cache manager to pattern update events.

use std::sync::Weak;

use pulse_core::events::{PatternEventHandler, PatternsUpdatedEvent};

use crate::manager::PatternCacheManager;

pub struct CacheInvalidationHandler {
    manager: Weak<PatternCacheManager>,
}

impl CacheInvalidationHandler {
    pub fn new(manager: Weak<PatternCacheManager>) -> Self {
        Self { manager }
    }
}

impl PatternEventHandler for CacheInvalidationHandler {
    fn on_patterns_updated(&self, event: &PatternsUpdatedEvent) {
        if let Some(manager) = self.manager.upgrade() {
            manager.invalidate_on_pattern_update(&event.update);
        }
    }
}
