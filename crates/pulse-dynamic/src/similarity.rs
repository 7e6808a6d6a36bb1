//! Pattern-to-pattern similarity used to build clusters.
//!
//! | Factor | Weight | Present when |
//! |--------|--------|--------------|
//! | type match | 0.3 | always |
//! | success-rate closeness | 0.2 | always |
//! | hypothesis Jaccard | 0.3 | both carry a hypothesis |
//! | timing closeness | 0.2 | both carry an average time to payment |
//!
//! The weighted sum is divided by the weights of the factors present.

use pulse_core::similarity::text_similarity;
use pulse_core::SuccessPattern;

const TYPE_WEIGHT: f64 = 0.3;
const RATE_WEIGHT: f64 = 0.2;
const HYPOTHESIS_WEIGHT: f64 = 0.3;
const TIMING_WEIGHT: f64 = 0.2;

pub fn pattern_similarity(a: &SuccessPattern, b: &SuccessPattern) -> f64 {
    let mut score = 0.0;
    let mut weight = 0.0;

    let type_match = if a.pattern_type() == b.pattern_type() { 1.0 } else { 0.0 };
    score += TYPE_WEIGHT * type_match;
    weight += TYPE_WEIGHT;

    score += RATE_WEIGHT * (1.0 - (a.success_rate - b.success_rate).abs()).max(0.0);
    weight += RATE_WEIGHT;

    if let (Some(ha), Some(hb)) = (a.pattern_data.hypothesis(), b.pattern_data.hypothesis()) {
        score += HYPOTHESIS_WEIGHT * text_similarity(ha, hb);
        weight += HYPOTHESIS_WEIGHT;
    }

    let payment_time = |p: &SuccessPattern| p.pattern_data.timing().and_then(|t| t.avg_time_to_payment_secs);
    if let (Some(ta), Some(tb)) = (payment_time(a), payment_time(b)) {
        let max = ta.max(tb);
        let closeness = if max <= 0.0 { 1.0 } else { 1.0 - (ta - tb).abs() / max };
        score += TIMING_WEIGHT * closeness;
        weight += TIMING_WEIGHT;
    }

    (score / weight).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pulse_core::models::{PatternData, TimingProfile};

    fn pattern(id: &str, data: PatternData, rate: f64) -> SuccessPattern {
        let now = Utc::now();
        SuccessPattern {
            id: id.into(),
            pattern_data: data,
            confidence_score: 0.8,
            sample_size: 5,
            success_rate: rate,
            statistical_significance: 0.05,
            identified_at: now,
            last_validated: now,
            is_active: true,
            client_segments: Vec::new(),
        }
    }

    fn timing(secs: f64) -> PatternData {
        PatternData::Timing {
            profile: TimingProfile {
                avg_time_to_payment_secs: Some(secs),
                sample_count: 3,
                ..Default::default()
            },
        }
    }

    #[test]
    fn identical_hypotheses_are_fully_similar() {
        let data = PatternData::Hypothesis { hypothesis: "Add urgency to CTA".into() };
        let a = pattern("a", data.clone(), 0.9);
        let b = pattern("b", data, 0.9);
        assert!((pattern_similarity(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn timing_closeness_uses_relative_gap() {
        let a = pattern("a", timing(100.0), 1.0);
        let b = pattern("b", timing(50.0), 1.0);
        // (0.3 + 0.2 + 0.2 * 0.5) / 0.7
        assert!((pattern_similarity(&a, &b) - 0.6 / 0.7).abs() < 1e-12);
    }

    #[test]
    fn different_types_share_only_rate() {
        let a = pattern("a", timing(100.0), 1.0);
        let b = pattern("b", PatternData::Hypothesis { hypothesis: "x".into() }, 1.0);
        assert!((pattern_similarity(&a, &b) - 0.4).abs() < 1e-12);
    }
}
