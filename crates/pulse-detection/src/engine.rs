//! PatternDetectionEngine: batch and incremental pattern discovery.

use std::sync::Arc;
use std::time::Instant;

use pulse_cache::PatternCacheManager;
use pulse_core::config::DetectionConfig;
use pulse_core::constants::HIGH_CONFIDENCE;
use pulse_core::errors::PulseResult;
use pulse_core::events::{AnalysisFailedEvent, EventDispatcher, PatternDiscoveredEvent};
use pulse_core::models::{ContentOutcomeData, PatternDetectionResult, SuccessPattern};
use pulse_core::similarity::outcome_similarity;
use pulse_core::traits::{Clock, OutcomeStore};
use pulse_recommend::recommendations_for_patterns;
use pulse_stats::{mean, ConfidenceWeights};

use crate::extraction::{extract_patterns, ExtractionContext};
use crate::grouping::{group_outcomes, OutcomeGroup};

pub struct PatternDetectionEngine {
    config: DetectionConfig,
    weights: ConfidenceWeights,
    store: Arc<dyn OutcomeStore>,
    cache: Option<Arc<PatternCacheManager>>,
    clock: Arc<dyn Clock>,
    events: Arc<EventDispatcher>,
}

impl PatternDetectionEngine {
    pub fn new(
        config: DetectionConfig,
        store: Arc<dyn OutcomeStore>,
        clock: Arc<dyn Clock>,
        events: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            config,
            weights: ConfidenceWeights::default(),
            store,
            cache: None,
            clock,
            events,
        }
    }

    /// Cache discovered patterns through `cache`.
    pub fn with_cache(mut self, cache: Arc<PatternCacheManager>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_weights(mut self, weights: ConfidenceWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Group `outcomes`, extract and score patterns, and summarize them.
    ///
    /// Never fails. Invalid input or an internal error is logged, reported
    /// as `analysis_failed`, and yields an empty result.
    pub fn analyze_outcomes(&self, outcomes: &[ContentOutcomeData]) -> PatternDetectionResult {
        let _span = tracing::info_span!("analyze_outcomes", outcomes = outcomes.len()).entered();
        let started = Instant::now();

        let mut result = match self.try_analyze(outcomes) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, outcomes = outcomes.len(), "pattern analysis failed");
                self.report_failure("analyze_outcomes", e.to_string());
                PatternDetectionResult::empty(outcomes.len(), 0)
            }
        };

        result.processing_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        if result.processing_time_ms > self.config.max_processing_time_ms {
            tracing::warn!(
                elapsed_ms = result.processing_time_ms,
                budget_ms = self.config.max_processing_time_ms,
                "pattern analysis exceeded its time budget"
            );
        }
        tracing::debug!(
            patterns = result.patterns.len(),
            groups = result.groups_found,
            elapsed_ms = result.processing_time_ms,
            "pattern analysis complete"
        );
        result
    }

    fn try_analyze(&self, outcomes: &[ContentOutcomeData]) -> PulseResult<PatternDetectionResult> {
        for outcome in outcomes {
            outcome.validate()?;
        }

        let groups: Vec<OutcomeGroup<'_>> = group_outcomes(outcomes, self.config.similarity_threshold)
            .into_iter()
            .filter(|g| g.success_count() >= u64::from(self.config.min_sample_size))
            .collect();

        let mut patterns = Vec::new();
        for group in &groups {
            patterns.extend(self.patterns_for(group)?);
        }

        let confidences: Vec<f64> = patterns.iter().map(|p| p.confidence_score).collect();
        Ok(PatternDetectionResult {
            outcomes_analyzed: outcomes.len(),
            groups_found: groups.len(),
            average_confidence: if confidences.is_empty() { 0.0 } else { mean(&confidences) },
            high_confidence_count: confidences.iter().filter(|c| **c > HIGH_CONFIDENCE).count(),
            recommendations: recommendations_for_patterns(&patterns),
            patterns,
            processing_time_ms: 0,
        })
    }

    /// Extract from one group and keep patterns above the confidence floor.
    fn patterns_for(&self, group: &OutcomeGroup<'_>) -> PulseResult<Vec<SuccessPattern>> {
        let ctx = ExtractionContext {
            config: &self.config,
            weights: &self.weights,
            now: self.clock.now(),
        };
        Ok(extract_patterns(group, &ctx)?
            .into_iter()
            .filter(|p| p.confidence_score >= self.config.min_confidence_threshold)
            .collect())
    }

    /// Look for patterns around a freshly recorded outcome.
    ///
    /// Pulls the client's recent history, keeps the outcomes similar to
    /// `outcome`, and extracts once at least `min_sample_size` of them
    /// succeeded. Qualifying patterns are saved, cached and announced.
    /// Errors are logged and produce an empty list.
    pub fn process_new_outcome(&self, client_id: &str, outcome: &ContentOutcomeData) -> Vec<SuccessPattern> {
        let _span = tracing::debug_span!("process_new_outcome", client_id).entered();
        match self.try_process(client_id, outcome) {
            Ok(patterns) => patterns,
            Err(e) => {
                tracing::warn!(client_id, error = %e, "incremental pattern detection failed");
                self.report_failure("process_new_outcome", e.to_string());
                Vec::new()
            }
        }
    }

    fn try_process(&self, client_id: &str, outcome: &ContentOutcomeData) -> PulseResult<Vec<SuccessPattern>> {
        outcome.validate()?;
        let history = self
            .store
            .client_history(client_id, self.config.recent_history_limit)?;

        let mut similar: Vec<&ContentOutcomeData> = vec![outcome];
        similar.extend(
            history
                .iter()
                .filter(|h| *h != outcome)
                .filter(|h| outcome_similarity(outcome, h) > self.config.similarity_threshold),
        );
        let group = OutcomeGroup::new(similar);
        if group.success_count() < u64::from(self.config.min_sample_size) {
            tracing::trace!(
                client_id,
                successes = group.success_count(),
                "not enough similar successes yet"
            );
            return Ok(Vec::new());
        }

        let patterns = self.patterns_for(&group)?;
        for pattern in &patterns {
            self.store.save_pattern(pattern)?;
            if let Some(cache) = &self.cache {
                if let Err(e) = cache.cache_pattern(pattern) {
                    tracing::warn!(pattern_id = %pattern.id, error = %e, "failed to cache pattern");
                }
            }
            tracing::info!(
                client_id,
                pattern_id = %pattern.id,
                pattern_type = %pattern.pattern_type(),
                confidence = pattern.confidence_score,
                sample_size = pattern.sample_size,
                "pattern discovered"
            );
            self.events.emit_pattern_discovered(&PatternDiscoveredEvent {
                pattern: pattern.clone(),
                client_id: Some(client_id.to_string()),
            });
        }
        Ok(patterns)
    }

    fn report_failure(&self, operation: &str, message: String) {
        self.events.emit_analysis_failed(&AnalysisFailedEvent {
            operation: operation.to_string(),
            message,
        });
    }
}
