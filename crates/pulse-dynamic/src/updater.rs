//! DynamicConfidenceUpdater: incremental confidence maintenance.
//!
//! ```text
//! base     = pattern_confidence(successes', n', consistency')
//! adjusted = base + (avg_cluster_confidence − base) × influence
//! final    = 0.6·base + 0.3·wilson_center + 0.1·adjusted
//! final   ×= 1 ± 0.05·client_importance            toward the outcome
//! final    = clamp(final, 0.9·wilson_lower, 1.1·wilson_upper) ∩ [0, 1]
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use pulse_core::config::DynamicConfig;
use pulse_core::config::defaults::DEFAULT_NULL_HYPOTHESIS;
use pulse_core::errors::PulseResult;
use pulse_core::events::{ConfidenceUpdatedEvent, EventDispatcher};
use pulse_core::models::{
    ConfidenceHistoryEntry, ConfidenceTrend, DynamicUpdateResult, OutcomeDataPoint, SimilarPattern,
    WilsonInterval,
};
use pulse_core::traits::Clock;
use pulse_core::SuccessPattern;
use pulse_stats::{
    calculate_pattern_confidence, calculate_statistical_significance, coefficient_of_variation,
    linear_regression_slope, mean, wilson_interval, ConfidenceWeights,
};

use crate::similarity::pattern_similarity;

const BASE_WEIGHT: f64 = 0.6;
const WILSON_WEIGHT: f64 = 0.3;
const ADJUSTED_WEIGHT: f64 = 0.1;
const IMPORTANCE_NUDGE: f64 = 0.05;
const LOWER_BOUND_SLACK: f64 = 0.9;
const UPPER_BOUND_SLACK: f64 = 1.1;

pub struct DynamicConfidenceUpdater {
    config: DynamicConfig,
    weights: ConfidenceWeights,
    null_hypothesis: f64,
    clock: Arc<dyn Clock>,
    events: Arc<EventDispatcher>,
    history: DashMap<String, VecDeque<ConfidenceHistoryEntry>>,
    clusters: DashMap<String, Vec<SimilarPattern>>,
    /// Latest known confidence per pattern, read when averaging a cluster.
    confidences: DashMap<String, f64>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl DynamicConfidenceUpdater {
    pub fn new(config: DynamicConfig, clock: Arc<dyn Clock>, events: Arc<EventDispatcher>) -> Self {
        Self {
            config,
            weights: ConfidenceWeights::default(),
            null_hypothesis: DEFAULT_NULL_HYPOTHESIS,
            clock,
            events,
            history: DashMap::new(),
            clusters: DashMap::new(),
            confidences: DashMap::new(),
            locks: DashMap::new(),
        }
    }

    pub fn with_null_hypothesis(mut self, null_hypothesis: f64) -> Self {
        self.null_hypothesis = null_hypothesis;
        self
    }

    pub fn with_weights(mut self, weights: ConfidenceWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn config(&self) -> &DynamicConfig {
        &self.config
    }

    fn lock_for(&self, pattern_id: &str) -> Arc<Mutex<()>> {
        let entry = self
            .locks
            .entry(pattern_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())));
        Arc::clone(&*entry)
    }

    /// Fold one outcome into `pattern`, mutating it in place.
    pub fn update_pattern_confidence(
        &self,
        pattern: &mut SuccessPattern,
        data: &OutcomeDataPoint,
    ) -> PulseResult<DynamicUpdateResult> {
        let lock = self.lock_for(&pattern.id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let now = self.clock.now();
        let previous_confidence = pattern.confidence_score;

        let prior_total = u64::from(pattern.sample_size);
        let prior_successes = u64::from(pattern.success_count()).min(prior_total);
        let total = prior_total + 1;
        let successes = prior_successes + u64::from(data.outcome.is_success());
        let success_rate = successes as f64 / total as f64;

        let consistency = self.incremental_consistency(&pattern.id, previous_confidence, success_rate);
        let wilson = self.bounded_wilson(successes, total)?;
        let base = calculate_pattern_confidence(successes, total, consistency, &self.weights)?;

        let similarity_adjustment = self
            .cluster_average(&pattern.id)
            .map(|avg| (avg - base) * self.config.cluster_influence)
            .unwrap_or(0.0);

        let mut confidence = BASE_WEIGHT * base
            + WILSON_WEIGHT * wilson.center
            + ADJUSTED_WEIGHT * (base + similarity_adjustment);

        let importance = data.client_importance.unwrap_or(0.0).clamp(0.0, 1.0);
        confidence *= if data.outcome.is_success() {
            1.0 + IMPORTANCE_NUDGE * importance
        } else {
            1.0 - IMPORTANCE_NUDGE * importance
        };

        let confidence = confidence
            .clamp(LOWER_BOUND_SLACK * wilson.lower, UPPER_BOUND_SLACK * wilson.upper)
            .clamp(0.0, 1.0);

        let significance = calculate_statistical_significance(successes, total, self.null_hypothesis)?;

        pattern.sample_size = pattern.sample_size.saturating_add(1);
        pattern.success_rate = success_rate;
        pattern.confidence_score = confidence;
        pattern.statistical_significance = significance.p_value;
        pattern.last_validated = now.max(pattern.identified_at);

        let trend = self.record_history(
            &pattern.id,
            ConfidenceHistoryEntry {
                confidence,
                success_rate,
                sample_size: pattern.sample_size,
                recorded_at: now,
            },
        );
        self.confidences.insert(pattern.id.clone(), confidence);

        let result = DynamicUpdateResult {
            pattern_id: pattern.id.clone(),
            previous_confidence,
            new_confidence: confidence,
            confidence_change: confidence - previous_confidence,
            wilson_interval: wilson,
            consistency,
            similarity_adjustment,
            trend,
            sample_size: pattern.sample_size,
            success_rate,
            updated_at: now,
        };

        tracing::debug!(
            pattern_id = %pattern.id,
            outcome = %data.outcome,
            previous = previous_confidence,
            new = confidence,
            trend = %trend,
            "pattern confidence updated"
        );
        self.events.emit_confidence_updated(&ConfidenceUpdatedEvent {
            result: result.clone(),
        });
        Ok(result)
    }

    /// `1 − CV` over the trailing confidences plus the new success rate.
    /// Without history the pattern's current confidence seeds the window.
    fn incremental_consistency(&self, pattern_id: &str, seed: f64, success_rate: f64) -> f64 {
        let mut window: Vec<f64> = match self.history.get(pattern_id) {
            Some(history) if !history.is_empty() => {
                let skip = history.len().saturating_sub(self.config.consistency_window);
                history.iter().skip(skip).map(|h| h.confidence).collect()
            }
            _ => vec![seed],
        };
        window.push(success_rate);
        (1.0 - coefficient_of_variation(&window)).clamp(0.0, 1.0)
    }

    /// Wilson interval at the configured level, widened by `0.5/n` on both
    /// sides for small samples.
    fn bounded_wilson(&self, successes: u64, total: u64) -> PulseResult<WilsonInterval> {
        let mut wilson = wilson_interval(successes, total, self.config.confidence_level)?;
        if total < u64::from(self.config.small_sample_threshold) {
            let correction = 0.5 / total as f64;
            wilson.lower = (wilson.lower - correction).max(0.0);
            wilson.upper = (wilson.upper + correction).min(1.0);
        }
        Ok(wilson)
    }

    fn cluster_average(&self, pattern_id: &str) -> Option<f64> {
        let cluster = self.clusters.get(pattern_id)?;
        let known: Vec<f64> = cluster
            .iter()
            .filter_map(|s| self.confidences.get(&s.pattern_id).map(|c| *c))
            .collect();
        if known.is_empty() {
            None
        } else {
            Some(mean(&known))
        }
    }

    fn record_history(&self, pattern_id: &str, entry: ConfidenceHistoryEntry) -> ConfidenceTrend {
        let mut history = self.history.entry(pattern_id.to_string()).or_default();
        history.push_back(entry);
        while history.len() > self.config.history_limit {
            history.pop_front();
        }
        self.trend_of(&history)
    }

    fn trend_of(&self, history: &VecDeque<ConfidenceHistoryEntry>) -> ConfidenceTrend {
        let skip = history.len().saturating_sub(self.config.trend_window);
        let recent: Vec<f64> = history.iter().skip(skip).map(|h| h.confidence).collect();
        let slope = linear_regression_slope(&recent);
        if slope > self.config.trend_threshold {
            ConfidenceTrend::Improving
        } else if slope < -self.config.trend_threshold {
            ConfidenceTrend::Declining
        } else {
            ConfidenceTrend::Stable
        }
    }

    /// Rebuild the similarity cluster of `target_id` from `patterns`.
    /// Keeps neighbours above the cluster threshold, best first, up to the
    /// cluster size. Returns an empty cluster if the target is not in `patterns`.
    pub fn update_pattern_similarity(
        &self,
        target_id: &str,
        patterns: &[SuccessPattern],
    ) -> Vec<SimilarPattern> {
        let Some(target) = patterns.iter().find(|p| p.id == target_id) else {
            return Vec::new();
        };

        let mut similar: Vec<SimilarPattern> = patterns
            .iter()
            .filter(|p| p.id != target_id)
            .map(|p| SimilarPattern {
                pattern_id: p.id.clone(),
                similarity: pattern_similarity(target, p),
            })
            .filter(|s| s.similarity > self.config.cluster_similarity_threshold)
            .collect();
        similar.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        similar.truncate(self.config.cluster_size);

        for p in patterns {
            self.confidences
                .entry(p.id.clone())
                .or_insert(p.confidence_score);
        }
        self.clusters.insert(target_id.to_string(), similar.clone());
        tracing::trace!(pattern_id = target_id, neighbours = similar.len(), "cluster rebuilt");
        similar
    }

    pub fn history(&self, pattern_id: &str) -> Vec<ConfidenceHistoryEntry> {
        self.history
            .get(pattern_id)
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn cluster(&self, pattern_id: &str) -> Vec<SimilarPattern> {
        self.clusters
            .get(pattern_id)
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    /// Trend over the stored history; `Stable` for unknown patterns.
    pub fn trend(&self, pattern_id: &str) -> ConfidenceTrend {
        self.history
            .get(pattern_id)
            .map(|h| self.trend_of(&h))
            .unwrap_or(ConfidenceTrend::Stable)
    }

    /// Number of patterns with update history.
    pub fn tracked_patterns(&self) -> usize {
        self.history.len()
    }

    /// Drop all state for one pattern.
    pub fn forget(&self, pattern_id: &str) {
        self.history.remove(pattern_id);
        self.clusters.remove(pattern_id);
        self.confidences.remove(pattern_id);
        self.locks.remove(pattern_id);
    }

    pub fn clear(&self) {
        self.history.clear();
        self.clusters.clear();
        self.confidences.clear();
        self.locks.clear();
    }
}
