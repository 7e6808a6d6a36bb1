// Single source of truth for all default values.

// --- Detection ---
pub const DEFAULT_MIN_SAMPLE_SIZE: u32 = 3;
pub const DEFAULT_MIN_CONFIDENCE_THRESHOLD: f64 = 0.6;
pub const DEFAULT_GROUP_SIMILARITY_THRESHOLD: f64 = 0.7;
pub const DEFAULT_CONTENT_ELEMENT_THRESHOLD: f64 = 0.6;
pub const DEFAULT_MIXED_PATTERN_THRESHOLD: f64 = 0.7;
pub const DEFAULT_RECENT_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_NULL_HYPOTHESIS: f64 = 0.5;
pub const DEFAULT_MAX_PROCESSING_TIME_MS: u64 = 30_000;
pub const DEFAULT_CONTENT_ADDRESSED_IDS: bool = false;

// --- Dynamic updates ---
pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const DEFAULT_CLUSTER_SIZE: usize = 5;
pub const DEFAULT_CLUSTER_SIMILARITY_THRESHOLD: f64 = 0.6;
pub const DEFAULT_CLUSTER_INFLUENCE: f64 = 0.1;
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;
pub const DEFAULT_CONSISTENCY_WINDOW: usize = 5;
pub const DEFAULT_TREND_WINDOW: usize = 5;
pub const DEFAULT_TREND_THRESHOLD: f64 = 0.02;
pub const DEFAULT_SMALL_SAMPLE_THRESHOLD: u32 = 30;
pub const DEFAULT_OUTCOME_MATCH_THRESHOLD: f64 = 0.7;

// --- Cache ---
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 1_000;
pub const DEFAULT_PATTERN_TTL_SECS: u64 = 3_600; // 1 hour
pub const DEFAULT_ALERT_TTL_SECS: u64 = 300; // 5 minutes
pub const DEFAULT_RECOMMENDATION_CACHE_TTL_SECS: u64 = 900; // 15 minutes
pub const DEFAULT_QUERY_TTL_SECS: u64 = 600; // 10 minutes
pub const DEFAULT_BATCH_WINDOW_MS: u64 = 1_000;
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 60;

// --- Recommendations ---
pub const DEFAULT_MAX_RECOMMENDATIONS_PER_SESSION: usize = 5;
pub const DEFAULT_MIN_PATTERN_CONFIDENCE: f64 = 0.7;
pub const DEFAULT_CONTENT_SWAP_SIMILARITY: f64 = 0.8;
pub const DEFAULT_AB_TEST_MIN_CONFIDENCE: f64 = 0.8;
pub const DEFAULT_AB_TEST_MIN_SAMPLE_SIZE: u32 = 10;
pub const DEFAULT_AB_TEST_MAX_P_VALUE: f64 = 0.05;
pub const DEFAULT_MAX_AB_TESTS_PER_UPDATE: usize = 2;
pub const DEFAULT_MIN_EXPECTED_IMPACT: f64 = 0.05;
pub const DEFAULT_LONG_TIME_ON_PAGE_SECS: f64 = 300.0;
pub const DEFAULT_LOW_ENGAGEMENT_THRESHOLD: f64 = 0.3;
pub const DEFAULT_HIGH_DROP_OFF_RISK: f64 = 0.7;
pub const DEFAULT_HESITATION_SECS: i64 = 120;
pub const DEFAULT_JOURNEY_IDLE_TIMEOUT_SECS: i64 = 1_800; // 30 minutes
pub const DEFAULT_INTERVENTION_TTL_SECS: i64 = 300;
pub const DEFAULT_RECOMMENDATION_TTL_SECS: i64 = 1_800;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
