//! Segment and behaviour based personalization.

use pulse_core::config::RecommendationConfig;
use pulse_core::models::{
    ActiveClientJourney, ImplementationDirective, RecommendationPriority, RecommendationType,
    SuccessPattern, Urgency,
};

use crate::draft::{metrics, Draft};
use crate::patterns::expected_lift;

const SEGMENT_LIFT_SCALE: f64 = 0.6;
const BEHAVIOURAL_LIFT_SCALE: f64 = 0.3;
const HIGH_ENGAGEMENT: f64 = 0.7;

fn segment_draft(
    config: &RecommendationConfig,
    journey: &ActiveClientJourney,
    patterns: &[SuccessPattern],
    dimension: &str,
    value: Option<&str>,
) -> Option<Draft> {
    let value = value?.trim().to_lowercase();
    if value.is_empty() {
        return None;
    }
    let best = patterns
        .iter()
        .filter(|p| p.is_active && p.confidence_score >= config.min_pattern_confidence)
        .filter(|p| p.client_segments.iter().any(|s| s.trim().to_lowercase() == value))
        .max_by(|a, b| a.confidence_score.total_cmp(&b.confidence_score))?;

    Some(Draft {
        kind: RecommendationType::Personalization,
        priority: RecommendationPriority::Low,
        urgency: Urgency::Soon,
        title: format!("Personalize for {dimension} {value}"),
        text: format!(
            "Patterns proven with {value} clients convert at {:.0}%; tailor messaging to match.",
            best.success_rate * 100.0
        ),
        based_on_patterns: vec![best.id.clone()],
        directive: ImplementationDirective::Personalize {
            dimension: dimension.to_string(),
            value,
            strategy: "segment-proven-messaging".to_string(),
        },
        monitoring_metrics: metrics(&["segment_conversion_rate"]),
        expected_impact: expected_lift(best, journey) * SEGMENT_LIFT_SCALE,
    })
}

/// Industry, company size, and behavioural personalization.
pub fn personalization_drafts(
    config: &RecommendationConfig,
    journey: &ActiveClientJourney,
    patterns: &[SuccessPattern],
) -> Vec<Draft> {
    let mut drafts = Vec::new();
    drafts.extend(segment_draft(
        config,
        journey,
        patterns,
        "industry",
        journey.industry.as_deref(),
    ));
    drafts.extend(segment_draft(
        config,
        journey,
        patterns,
        "company-size",
        journey.company_size.as_deref(),
    ));

    if journey.engagement_score > HIGH_ENGAGEMENT
        && journey.conversion_probability < journey.engagement_score
    {
        drafts.push(Draft {
            kind: RecommendationType::Personalization,
            priority: RecommendationPriority::Low,
            urgency: Urgency::Soon,
            title: "Engaged but undecided".to_string(),
            text: "Engagement is high but conversion is lagging; offer a tailored proposal."
                .to_string(),
            based_on_patterns: Vec::new(),
            directive: ImplementationDirective::Personalize {
                dimension: "behaviour".to_string(),
                value: "high-engagement".to_string(),
                strategy: "tailored-proposal".to_string(),
            },
            monitoring_metrics: metrics(&["engagement_score", "conversion_probability"]),
            expected_impact: (journey.engagement_score - journey.conversion_probability)
                * BEHAVIOURAL_LIFT_SCALE,
        });
    }
    drafts
}
