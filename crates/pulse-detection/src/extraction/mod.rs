//! Pattern extraction from one outcome group.
//!
//! Each extractor looks at the group's successful outcomes and proposes a
//! payload plus a type-specific consistency score. Scoring always uses the
//! whole group's success and total counts.

mod content;
mod hypothesis;
mod mixed;
mod timing;

pub use content::{extract_content, shared_elements};
pub use hypothesis::{dominant_hypothesis, extract_hypothesis};
pub use mixed::compose_mixed;
pub use timing::{extract_timing, timing_profile};

use chrono::{DateTime, Utc};
use pulse_core::config::DetectionConfig;
use pulse_core::errors::PulseResult;
use pulse_core::models::{PatternData, SuccessPattern};
use pulse_stats::{calculate_pattern_confidence, calculate_statistical_significance, ConfidenceWeights};

use crate::grouping::OutcomeGroup;

/// A proposed payload before scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub data: PatternData,
    pub consistency: f64,
}

/// Everything extraction needs besides the group itself.
pub struct ExtractionContext<'a> {
    pub config: &'a DetectionConfig,
    pub weights: &'a ConfidenceWeights,
    pub now: DateTime<Utc>,
}

/// Run every extractor on `group`, compose a mixed pattern when enough
/// components are strong, and score the lot. No confidence filtering here.
pub fn extract_patterns(group: &OutcomeGroup<'_>, ctx: &ExtractionContext<'_>) -> PulseResult<Vec<SuccessPattern>> {
    let min = ctx.config.min_sample_size as usize;
    let candidates: Vec<Candidate> = [
        extract_hypothesis(group, min),
        extract_content(group, min, ctx.config.content_element_threshold),
        extract_timing(group, min),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut patterns = candidates
        .into_iter()
        .map(|c| score(group, c, ctx))
        .collect::<PulseResult<Vec<_>>>()?;

    if let Some((data, confidence)) = compose_mixed(&patterns, ctx.config.mixed_pattern_threshold) {
        patterns.push(build(group, data, confidence, ctx)?);
    }
    Ok(patterns)
}

/// Turn a candidate into a pattern scored on the group's counts.
fn score(group: &OutcomeGroup<'_>, candidate: Candidate, ctx: &ExtractionContext<'_>) -> PulseResult<SuccessPattern> {
    let confidence = calculate_pattern_confidence(
        group.success_count(),
        group.total(),
        candidate.consistency,
        ctx.weights,
    )?;
    build(group, candidate.data, confidence, ctx)
}

fn build(
    group: &OutcomeGroup<'_>,
    data: PatternData,
    confidence: f64,
    ctx: &ExtractionContext<'_>,
) -> PulseResult<SuccessPattern> {
    let total = group.total();
    let significance =
        calculate_statistical_significance(group.success_count(), total, ctx.config.null_hypothesis)?;
    let created_at = (!ctx.config.content_addressed_ids).then_some(ctx.now);
    let id = SuccessPattern::generate_id(&data, created_at)?;

    Ok(SuccessPattern {
        id,
        pattern_data: data,
        confidence_score: confidence,
        sample_size: u32::try_from(total).unwrap_or(u32::MAX),
        success_rate: group.success_rate(),
        statistical_significance: significance.p_value,
        identified_at: ctx.now,
        last_validated: ctx.now,
        is_active: true,
        client_segments: group.segments(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::models::{ContentOutcomeData, Outcome, PatternType, TimingFactors};

    fn ctx<'a>(config: &'a DetectionConfig, weights: &'a ConfidenceWeights) -> ExtractionContext<'a> {
        ExtractionContext { config, weights, now: Utc::now() }
    }

    fn success(hypothesis: &str, ttp: f64) -> ContentOutcomeData {
        ContentOutcomeData::new("c", Outcome::Success, Utc::now())
            .with_hypothesis(hypothesis)
            .with_timing(TimingFactors {
                time_to_payment_secs: Some(ttp),
                ..Default::default()
            })
    }

    #[test]
    fn hypothesis_and_timing_compose_into_mixed() {
        let outcomes: Vec<ContentOutcomeData> =
            (0..6).map(|_| success("Add urgency to CTA", 120.0)).collect();
        let group = OutcomeGroup::new(outcomes.iter().collect());
        let config = DetectionConfig::default();
        let weights = ConfidenceWeights::default();
        let patterns = extract_patterns(&group, &ctx(&config, &weights)).unwrap();

        let types: Vec<PatternType> = patterns.iter().map(|p| p.pattern_type()).collect();
        assert_eq!(types, vec![PatternType::Hypothesis, PatternType::Timing, PatternType::Mixed]);

        let component_avg = (patterns[0].confidence_score + patterns[1].confidence_score) / 2.0;
        let mixed = &patterns[2];
        assert!((mixed.confidence_score - (component_avg + 0.04).min(1.0)).abs() < 1e-9);
        assert_eq!(mixed.sample_size, 6);
    }

    #[test]
    fn content_addressed_ids_are_stable() {
        let outcomes: Vec<ContentOutcomeData> =
            (0..3).map(|_| success("Add urgency to CTA", 60.0)).collect();
        let group = OutcomeGroup::new(outcomes.iter().collect());
        let config = DetectionConfig {
            content_addressed_ids: true,
            ..Default::default()
        };
        let weights = ConfidenceWeights::default();
        let a = extract_patterns(&group, &ctx(&config, &weights)).unwrap();
        let b = extract_patterns(&group, &ctx(&config, &weights)).unwrap();
        assert_eq!(a[0].id, b[0].id);
        assert!(a[0].id.starts_with("hypothesis_"));
    }
}
