//! Event payload types.

use crate::models::{DynamicUpdateResult, PatternUpdateResult, RealTimeRecommendation, SuccessPattern};

/// Payload for `on_pattern_discovered`.
#[derive(Debug, Clone)]
pub struct PatternDiscoveredEvent {
    pub pattern: SuccessPattern,
    pub client_id: Option<String>,
}

/// Payload for `on_confidence_updated`.
#[derive(Debug, Clone)]
pub struct ConfidenceUpdatedEvent {
    pub result: DynamicUpdateResult,
}

/// Payload for `on_patterns_updated`.
#[derive(Debug, Clone)]
pub struct PatternsUpdatedEvent {
    pub update: PatternUpdateResult,
}

/// Payload for `on_recommendations_generated`.
#[derive(Debug, Clone)]
pub struct RecommendationsGeneratedEvent {
    pub client_id: String,
    pub recommendations: Vec<RealTimeRecommendation>,
}

/// Payload for `on_cache_invalidated`.
#[derive(Debug, Clone)]
pub struct CacheInvalidatedEvent {
    pub keys: Vec<String>,
    pub strategy: String,
}

/// Payload for `on_analysis_failed`.
#[derive(Debug, Clone)]
pub struct AnalysisFailedEvent {
    pub operation: String,
    pub message: String,
}
