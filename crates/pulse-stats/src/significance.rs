//! Two-sided binomial significance against a null success probability.
//!
//! Uses the normal approximation with a continuity correction, which is
//! adequate at the sample sizes patterns are promoted at and keeps the hot
//! path allocation-free.

use pulse_core::constants::Z_95;
use pulse_core::errors::{PulseResult, StatsError};
use pulse_core::models::WilsonInterval;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::wilson::wilson_with_z;

const SIGNIFICANCE_ALPHA: f64 = 0.05;
const STRONG_MIN_SAMPLES: u64 = 10;
const MODERATE_MIN_SAMPLES: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationStrength {
    Strong,
    Moderate,
    Weak,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceResult {
    pub p_value: f64,
    pub confidence_interval: WilsonInterval,
    /// Cohen's h between the observed rate and the null probability.
    pub effect_size: f64,
    pub statistical_power: f64,
    pub is_significant: bool,
    pub recommendation_strength: RecommendationStrength,
}

impl SignificanceResult {
    fn no_data() -> Self {
        Self {
            p_value: 1.0,
            confidence_interval: WilsonInterval {
                lower: 0.0,
                upper: 0.0,
                center: 0.0,
            },
            effect_size: 0.0,
            statistical_power: 0.0,
            is_significant: false,
            recommendation_strength: RecommendationStrength::Weak,
        }
    }
}

/// Test `success_count / total_attempts` against `null_hypothesis` and grade
/// the evidence. Zero attempts yields p = 1 and an empty interval.
pub fn calculate_statistical_significance(
    success_count: u64,
    total_attempts: u64,
    null_hypothesis: f64,
) -> PulseResult<SignificanceResult> {
    if success_count > total_attempts {
        return Err(StatsError::SuccessExceedsTotal {
            success_count,
            total_attempts,
        }
        .into());
    }
    if !(null_hypothesis > 0.0 && null_hypothesis < 1.0) {
        return Err(StatsError::InvalidProbability {
            name: "null_hypothesis",
            value: null_hypothesis,
        }
        .into());
    }
    if total_attempts == 0 {
        return Ok(SignificanceResult::no_data());
    }

    let n = total_attempts as f64;
    let observed = success_count as f64 / n;
    let expected = n * null_hypothesis;
    let sd = (n * null_hypothesis * (1.0 - null_hypothesis)).sqrt();
    let z = ((success_count as f64 - expected).abs() - 0.5).max(0.0) / sd;
    let p_value = (2.0 * (1.0 - Normal::standard().cdf(z))).clamp(0.0, 1.0);

    let effect_size = cohens_h(observed, null_hypothesis);
    let statistical_power =
        statistical_power(null_hypothesis, observed, total_attempts, SIGNIFICANCE_ALPHA);
    let is_significant = p_value < SIGNIFICANCE_ALPHA;

    let recommendation_strength = if p_value < 0.01
        && effect_size > 0.5
        && total_attempts >= STRONG_MIN_SAMPLES
    {
        RecommendationStrength::Strong
    } else if is_significant && effect_size > 0.2 && total_attempts >= MODERATE_MIN_SAMPLES {
        RecommendationStrength::Moderate
    } else {
        RecommendationStrength::Weak
    };

    Ok(SignificanceResult {
        p_value,
        confidence_interval: wilson_with_z(observed, n, Z_95),
        effect_size,
        statistical_power,
        is_significant,
        recommendation_strength,
    })
}

/// Cohen's h: `|2·asin(√p1) − 2·asin(√p2)|`. Inputs are clamped to [0, 1].
pub fn cohens_h(p1: f64, p2: f64) -> f64 {
    let phi = |p: f64| 2.0 * p.clamp(0.0, 1.0).sqrt().asin();
    (phi(p1) - phi(p2)).abs()
}

/// Approximate power of a two-sided one-proportion z-test at `alpha` to
/// detect a true rate `p1` against `p0` with `n` trials.
pub fn statistical_power(p0: f64, p1: f64, n: u64, alpha: f64) -> f64 {
    if n == 0 || !(alpha > 0.0 && alpha < 1.0) {
        return 0.0;
    }
    let normal = Normal::standard();
    let n = n as f64;
    let z_alpha = normal.inverse_cdf(1.0 - alpha / 2.0);
    let se0 = (p0 * (1.0 - p0) / n).sqrt();
    let se1 = (p1 * (1.0 - p1) / n).sqrt();
    let delta = (p1 - p0).abs();
    if se1 == 0.0 {
        return if delta > z_alpha * se0 { 1.0 } else { 0.0 };
    }
    normal.cdf((delta - z_alpha * se0) / se1).clamp(0.0, 1.0)
}
