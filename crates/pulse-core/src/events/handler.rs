//! Handler trait with no-op defaults, so subscribers implement only what they need.

use super::types::*;

pub trait PatternEventHandler: Send + Sync {
    fn on_pattern_discovered(&self, _event: &PatternDiscoveredEvent) {}

    fn on_confidence_updated(&self, _event: &ConfidenceUpdatedEvent) {}

    fn on_patterns_updated(&self, _event: &PatternsUpdatedEvent) {}

    fn on_recommendations_generated(&self, _event: &RecommendationsGeneratedEvent) {}

    fn on_cache_invalidated(&self, _event: &CacheInvalidatedEvent) {}

    fn on_analysis_failed(&self, _event: &AnalysisFailedEvent) {}
}
