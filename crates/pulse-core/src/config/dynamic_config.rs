use serde::{Deserialize, Serialize};

use super::defaults;

/// Dynamic confidence updater configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicConfig {
    /// History entries retained per pattern.
    pub history_limit: usize,
    /// Similar patterns retained per cluster.
    pub cluster_size: usize,
    pub cluster_similarity_threshold: f64,
    pub cluster_influence: f64,
    /// Wilson interval confidence level.
    pub confidence_level: f64,
    /// Trailing confidences used for incremental consistency.
    pub consistency_window: usize,
    pub trend_window: usize,
    /// Minimum regression slope (per update) to call a trend.
    pub trend_threshold: f64,
    /// Below this sample count the Wilson bounds get a `0.5/n` correction.
    pub small_sample_threshold: u32,
    /// Outcome/pattern similarity above which an outcome updates a pattern.
    pub outcome_match_threshold: f64,
}

impl Default for DynamicConfig {
    fn default() -> Self {
        Self {
            history_limit: defaults::DEFAULT_HISTORY_LIMIT,
            cluster_size: defaults::DEFAULT_CLUSTER_SIZE,
            cluster_similarity_threshold: defaults::DEFAULT_CLUSTER_SIMILARITY_THRESHOLD,
            cluster_influence: defaults::DEFAULT_CLUSTER_INFLUENCE,
            confidence_level: defaults::DEFAULT_CONFIDENCE_LEVEL,
            consistency_window: defaults::DEFAULT_CONSISTENCY_WINDOW,
            trend_window: defaults::DEFAULT_TREND_WINDOW,
            trend_threshold: defaults::DEFAULT_TREND_THRESHOLD,
            small_sample_threshold: defaults::DEFAULT_SMALL_SAMPLE_THRESHOLD,
            outcome_match_threshold: defaults::DEFAULT_OUTCOME_MATCH_THRESHOLD,
        }
    }
}
