use serde::{Deserialize, Serialize};

use super::defaults;

/// Pattern detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum successful outcomes before a group can yield a pattern.
    pub min_sample_size: u32,
    /// Patterns below this confidence are dropped.
    pub min_confidence_threshold: f64,
    /// Pairwise similarity required to join a group (strictly greater).
    pub similarity_threshold: f64,
    /// Share of group samples an element must appear in.
    pub content_element_threshold: f64,
    /// Sub-pattern confidence required to contribute to a mixed pattern.
    pub mixed_pattern_threshold: f64,
    /// How many recent outcomes the incremental path fetches per client.
    pub recent_history_limit: usize,
    /// Null hypothesis success rate for the binomial test.
    pub null_hypothesis: f64,
    /// Reported only; analysis is never interrupted.
    pub max_processing_time_ms: u64,
    /// Drop the creation timestamp from pattern ids.
    pub content_addressed_ids: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_sample_size: defaults::DEFAULT_MIN_SAMPLE_SIZE,
            min_confidence_threshold: defaults::DEFAULT_MIN_CONFIDENCE_THRESHOLD,
            similarity_threshold: defaults::DEFAULT_GROUP_SIMILARITY_THRESHOLD,
            content_element_threshold: defaults::DEFAULT_CONTENT_ELEMENT_THRESHOLD,
            mixed_pattern_threshold: defaults::DEFAULT_MIXED_PATTERN_THRESHOLD,
            recent_history_limit: defaults::DEFAULT_RECENT_HISTORY_LIMIT,
            null_hypothesis: defaults::DEFAULT_NULL_HYPOTHESIS,
            max_processing_time_ms: defaults::DEFAULT_MAX_PROCESSING_TIME_MS,
            content_addressed_ids: defaults::DEFAULT_CONTENT_ADDRESSED_IDS,
        }
    }
}
