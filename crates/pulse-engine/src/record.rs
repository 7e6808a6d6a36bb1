//! Outcome recording: confidence updates, incremental detection, fan-out.

use std::sync::Arc;

use pulse_core::errors::{PulseError, PulseResult};
use pulse_core::events::PatternsUpdatedEvent;
use pulse_core::models::{ContentOutcomeData, OutcomeDataPoint, PatternUpdateResult, SuccessPattern};
use pulse_core::similarity::outcome_pattern_similarity;
use pulse_observability::update_span;
use tokio::task::JoinHandle;

use crate::runtime::PulseRuntime;

impl PulseRuntime {
    /// Fold one outcome into the engine.
    ///
    /// Every active pattern the outcome matches gets a confidence update and
    /// is saved back. The outcome then goes through incremental detection.
    /// If anything changed, `patterns_updated` is emitted, which invalidates
    /// the cache and refreshes affected journeys, and the changed patterns
    /// are re-cached.
    ///
    /// The outcome itself is not written to the store; callers record it
    /// wherever their history lives.
    pub fn record_outcome(&self, client_id: &str, outcome: &ContentOutcomeData) -> PulseResult<PatternUpdateResult> {
        let _span = update_span!(client_id).entered();
        outcome.validate()?;

        let active = self.store.active_patterns()?;
        let threshold = self.dynamic.config().outcome_match_threshold;
        let point = OutcomeDataPoint::from(outcome);

        let mut update = PatternUpdateResult {
            affected_clients: vec![client_id.to_string()],
            ..Default::default()
        };
        for pattern in &active {
            if outcome_pattern_similarity(outcome, pattern) <= threshold {
                continue;
            }
            self.dynamic.update_pattern_similarity(&pattern.id, &active);
            let mut pattern = pattern.clone();
            let result = self.dynamic.update_pattern_confidence(&mut pattern, &point)?;
            self.store.save_pattern(&pattern)?;
            update.confidence_updates.push(result);
            update.updated_patterns.push(pattern);
        }

        let discovered = self.detection.process_new_outcome(client_id, outcome);
        update.new_patterns = discovered
            .into_iter()
            .filter(|p| !update.updated_patterns.iter().any(|u| u.id == p.id))
            .collect();

        tracing::debug!(
            client_id,
            updated = update.updated_patterns.len(),
            discovered = update.new_patterns.len(),
            "outcome recorded"
        );
        if update.is_empty() {
            return Ok(update);
        }

        self.events.emit_patterns_updated(&PatternsUpdatedEvent { update: update.clone() });
        for pattern in update.patterns() {
            self.recache(pattern);
        }
        Ok(update)
    }

    fn recache(&self, pattern: &SuccessPattern) {
        if let Err(e) = self.cache.cache_pattern(pattern) {
            tracing::warn!(pattern_id = %pattern.id, error = %e, "failed to cache pattern");
        }
    }

    /// Run [`record_outcome`](Self::record_outcome) on the tokio blocking
    /// pool. The caller gets a handle and never waits on the analytics.
    pub fn spawn_record_outcome(
        self: &Arc<Self>,
        client_id: impl Into<String>,
        outcome: ContentOutcomeData,
    ) -> PulseResult<JoinHandle<PulseResult<PatternUpdateResult>>> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| PulseError::Runtime(e.to_string()))?;
        let this = Arc::clone(self);
        let client_id = client_id.into();
        Ok(runtime.spawn_blocking(move || {
            let result = this.record_outcome(&client_id, &outcome);
            if let Err(e) = &result {
                tracing::warn!(client_id = %client_id, error = %e, "background outcome recording failed");
            }
            result
        }))
    }
}
