//! # pulse-stats
//!
//! Pure, stateless statistics behind every Pulse confidence score.
//!
//! | Function | Output |
//! |----------|--------|
//! | `calculate_pattern_confidence` | weighted blend of sample size, success rate, consistency |
//! | `calculate_consistency_score` | `1 − variance / 0.25` over boolean outcomes |
//! | `calculate_statistical_significance` | binomial test, Wilson interval, Cohen's h, power |
//! | `wilson_interval` | Wilson score interval at any confidence level |
//!
//! Validation errors (`success > total`, out-of-range inputs) are returned
//! to the caller. Insufficient data is not an error: zero attempts yields
//! confidence 0 and p = 1.

pub mod confidence;
pub mod consistency;
pub mod descriptive;
pub mod significance;
pub mod wilson;

pub use confidence::{calculate_pattern_confidence, ConfidenceWeights};
pub use consistency::calculate_consistency_score;
pub use descriptive::{coefficient_of_variation, linear_regression_slope, mean};
pub use significance::{
    calculate_statistical_significance, cohens_h, statistical_power, RecommendationStrength,
    SignificanceResult,
};
pub use wilson::{wilson_interval, z_for_level};
