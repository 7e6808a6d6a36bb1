use serde::{Deserialize, Serialize};

use super::defaults;

/// Real-time recommendation engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub max_recommendations_per_session: usize,
    pub min_pattern_confidence: f64,
    /// Content swaps are suggested only below this similarity to the current content.
    pub content_swap_similarity: f64,
    pub ab_test_min_confidence: f64,
    pub ab_test_min_sample_size: u32,
    pub ab_test_max_p_value: f64,
    pub max_ab_tests_per_update: usize,
    pub min_expected_impact: f64,
    pub long_time_on_page_secs: f64,
    pub low_engagement_threshold: f64,
    pub high_drop_off_risk: f64,
    pub hesitation_secs: i64,
    pub journey_idle_timeout_secs: i64,
    pub intervention_ttl_secs: i64,
    pub recommendation_ttl_secs: i64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            max_recommendations_per_session: defaults::DEFAULT_MAX_RECOMMENDATIONS_PER_SESSION,
            min_pattern_confidence: defaults::DEFAULT_MIN_PATTERN_CONFIDENCE,
            content_swap_similarity: defaults::DEFAULT_CONTENT_SWAP_SIMILARITY,
            ab_test_min_confidence: defaults::DEFAULT_AB_TEST_MIN_CONFIDENCE,
            ab_test_min_sample_size: defaults::DEFAULT_AB_TEST_MIN_SAMPLE_SIZE,
            ab_test_max_p_value: defaults::DEFAULT_AB_TEST_MAX_P_VALUE,
            max_ab_tests_per_update: defaults::DEFAULT_MAX_AB_TESTS_PER_UPDATE,
            min_expected_impact: defaults::DEFAULT_MIN_EXPECTED_IMPACT,
            long_time_on_page_secs: defaults::DEFAULT_LONG_TIME_ON_PAGE_SECS,
            low_engagement_threshold: defaults::DEFAULT_LOW_ENGAGEMENT_THRESHOLD,
            high_drop_off_risk: defaults::DEFAULT_HIGH_DROP_OFF_RISK,
            hesitation_secs: defaults::DEFAULT_HESITATION_SECS,
            journey_idle_timeout_secs: defaults::DEFAULT_JOURNEY_IDLE_TIMEOUT_SECS,
            intervention_ttl_secs: defaults::DEFAULT_INTERVENTION_TTL_SECS,
            recommendation_ttl_secs: defaults::DEFAULT_RECOMMENDATION_TTL_SECS,
        }
    }
}
