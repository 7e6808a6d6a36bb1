//! Pattern confidence: weighted blend of sample-size adequacy, success rate,
//! and outcome consistency.
//!
//! ```text
//! sample_term  = min(log10(n + 1) / log10(11), 1)     saturates at 10 samples
//! success_term = successes / n
//! confidence   = w_s·sample_term + w_r·success_term + w_c·consistency   clamped to [0, 1]
//! ```

use pulse_core::constants::SAMPLE_SIZE_SATURATION;
use pulse_core::errors::{PulseResult, StatsError};
use serde::{Deserialize, Serialize};

/// Blend weights. Defaults: 0.4 sample size, 0.4 success rate, 0.2 consistency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    pub sample_size: f64,
    pub success_rate: f64,
    pub consistency: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            sample_size: 0.4,
            success_rate: 0.4,
            consistency: 0.2,
        }
    }
}

/// Confidence in [0, 1] for a pattern seen `total_attempts` times. Zero
/// attempts scores 0.
pub fn calculate_pattern_confidence(
    success_count: u64,
    total_attempts: u64,
    consistency_score: f64,
    weights: &ConfidenceWeights,
) -> PulseResult<f64> {
    if success_count > total_attempts {
        return Err(StatsError::SuccessExceedsTotal {
            success_count,
            total_attempts,
        }
        .into());
    }
    if !(0.0..=1.0).contains(&consistency_score) {
        return Err(StatsError::ConsistencyOutOfRange {
            value: consistency_score,
        }
        .into());
    }
    if total_attempts == 0 {
        return Ok(0.0);
    }

    let n = total_attempts as f64;
    let sample_term = ((n + 1.0).log10() / (SAMPLE_SIZE_SATURATION + 1.0).log10()).min(1.0);
    let success_term = success_count as f64 / n;

    let confidence = weights.sample_size * sample_term
        + weights.success_rate * success_term
        + weights.consistency * consistency_score;
    Ok(confidence.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conf(s: u64, n: u64, c: f64) -> f64 {
        calculate_pattern_confidence(s, n, c, &ConfidenceWeights::default()).unwrap()
    }

    #[test]
    fn zero_attempts_is_zero() {
        assert_eq!(conf(0, 0, 1.0), 0.0);
    }

    #[test]
    fn saturates_at_ten_samples() {
        assert!((conf(10, 10, 1.0) - 1.0).abs() < 1e-12);
        assert!((conf(100, 100, 1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn five_perfect_samples() {
        // 0.4 * log10(6)/log10(11) + 0.4 + 0.2
        let expected = 0.4 * (6f64.log10() / 11f64.log10()) + 0.6;
        assert!((conf(5, 5, 1.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn rejects_success_above_total() {
        assert!(calculate_pattern_confidence(4, 3, 0.5, &ConfidenceWeights::default()).is_err());
    }

    #[test]
    fn rejects_out_of_range_consistency() {
        let w = ConfidenceWeights::default();
        assert!(calculate_pattern_confidence(1, 3, 1.01, &w).is_err());
        assert!(calculate_pattern_confidence(1, 3, -0.1, &w).is_err());
        assert!(calculate_pattern_confidence(1, 3, f64::NAN, &w).is_err());
    }
}
