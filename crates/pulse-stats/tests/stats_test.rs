//! Behavioural tests for the confidence and significance calculator.

use pulse_core::errors::{PulseError, PulseErrorCode, StatsError};
use pulse_stats::*;

// ── T-01: confidence edge cases ──

#[test]
fn confidence_is_zero_without_attempts() {
    let c = calculate_pattern_confidence(0, 0, 0.5, &ConfidenceWeights::default()).unwrap();
    assert_eq!(c, 0.0);
}

#[test]
fn confidence_rejects_more_successes_than_attempts() {
    let err = calculate_pattern_confidence(6, 5, 1.0, &ConfidenceWeights::default()).unwrap_err();
    assert!(matches!(
        err,
        PulseError::Stats(StatsError::SuccessExceedsTotal {
            success_count: 6,
            total_attempts: 5
        })
    ));
    assert_eq!(err.error_code(), "STATS_ERROR");
}

#[test]
fn custom_weights_are_applied() {
    let weights = ConfidenceWeights {
        sample_size: 0.0,
        success_rate: 1.0,
        consistency: 0.0,
    };
    let c = calculate_pattern_confidence(3, 4, 0.0, &weights).unwrap();
    assert!((c - 0.75).abs() < 1e-12);
}

// ── T-02: consistency ──

#[test]
fn consistency_reference_values() {
    assert_eq!(calculate_consistency_score(&[true]), 1.0);
    assert_eq!(calculate_consistency_score(&[true, true, true]), 1.0);
    assert!(calculate_consistency_score(&[true, false, true, false]) < 1e-9);
}

// ── T-03: significance ──

#[test]
fn all_successes_reject_even_null() {
    let r = calculate_statistical_significance(5, 5, 0.5).unwrap();
    assert!(r.p_value < 0.2);
    assert!(r.confidence_interval.lower > 0.0);
    assert!(r.confidence_interval.upper <= 1.0);
}

#[test]
fn significance_without_data_is_weak() {
    let r = calculate_statistical_significance(0, 0, 0.5).unwrap();
    assert_eq!(r.p_value, 1.0);
    assert_eq!(r.recommendation_strength, RecommendationStrength::Weak);
    assert_eq!(r.statistical_power, 0.0);
}

#[test]
fn cohens_h_is_symmetric() {
    assert!((cohens_h(0.3, 0.7) - cohens_h(0.7, 0.3)).abs() < 1e-12);
    assert_eq!(cohens_h(0.4, 0.4), 0.0);
}

// ── T-04: Wilson intervals ──

#[test]
fn wilson_empty_sample() {
    let w = wilson_interval(0, 0, 0.95).unwrap();
    assert_eq!(w.lower, 0.0);
    assert_eq!(w.upper, 1.0);
    assert_eq!(w.center, 0.5);
}

#[test]
fn wilson_width_shrinks_with_sample_size() {
    let mut last = f64::INFINITY;
    for n in [4u64, 8, 16, 32, 64, 128] {
        let w = wilson_interval(n * 3 / 4, n, 0.95).unwrap();
        assert!(w.width() < last, "width did not shrink at n = {n}");
        last = w.width();
    }
}

#[test]
fn higher_level_widens_interval() {
    let w90 = wilson_interval(7, 10, 0.90).unwrap();
    let w99 = wilson_interval(7, 10, 0.99).unwrap();
    assert!(w99.width() > w90.width());
}

// ── T-05: descriptive helpers ──

#[test]
fn slope_sign_follows_direction() {
    assert!(linear_regression_slope(&[0.5, 0.6, 0.7]) > 0.0);
    assert!(linear_regression_slope(&[0.7, 0.6, 0.5]) < 0.0);
    assert_eq!(linear_regression_slope(&[0.6, 0.6, 0.6]), 0.0);
}

#[test]
fn mean_of_empty_is_zero() {
    assert_eq!(mean(&[]), 0.0);
    assert_eq!(coefficient_of_variation(&[]), 0.0);
}
