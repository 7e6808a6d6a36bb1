//! Adapter that subscribes the recommendation engine to pattern updates.

use std::sync::Weak;

use pulse_core::events::{PatternEventHandler, PatternsUpdatedEvent};

use crate::engine::RealtimeRecommendationEngine;

pub struct RecommendationRefreshHandler {
    engine: Weak<RealtimeRecommendationEngine>,
}

impl RecommendationRefreshHandler {
    pub fn new(engine: Weak<RealtimeRecommendationEngine>) -> Self {
        Self { engine }
    }
}

impl PatternEventHandler for RecommendationRefreshHandler {
    fn on_patterns_updated(&self, event: &PatternsUpdatedEvent) {
        if let Some(engine) = self.engine.upgrade() {
            engine.process_pattern_update(&event.update);
        }
    }
}
