/// Pulse engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum possible variance of a Bernoulli variable (attained at p = 0.5).
pub const MAX_BERNOULLI_VARIANCE: f64 = 0.25;

/// Sample count at which the logarithmic sample-size term saturates.
pub const SAMPLE_SIZE_SATURATION: f64 = 10.0;

/// z-score for a two-sided 95% interval.
pub const Z_95: f64 = 1.96;

/// Confidence above which a pattern counts as high confidence.
pub const HIGH_CONFIDENCE: f64 = 0.8;

/// Confidence bonus per sub-pattern folded into a mixed pattern.
pub const MIXED_PATTERN_BONUS_PER_COMPONENT: f64 = 0.02;

/// Cap on the total mixed-pattern bonus.
pub const MIXED_PATTERN_BONUS_CAP: f64 = 0.1;

/// Cache segment shares of the configured `max_entries`.
pub const PATTERN_SEGMENT_SHARE: f64 = 0.60;
pub const ALERT_SEGMENT_SHARE: f64 = 0.20;
pub const RECOMMENDATION_SEGMENT_SHARE: f64 = 0.15;
pub const QUERY_SEGMENT_SHARE: f64 = 0.05;
