//! Pattern-driven recommendations: content swaps, timing, and A/B tests.

use pulse_core::config::RecommendationConfig;
use pulse_core::models::{
    ActiveClientJourney, CurrentContent, ImplementationDirective, PatternType, RecommendationPriority,
    RecommendationType, SuccessPattern, Urgency,
};
use pulse_core::similarity::{content_similarity, text_similarity};

use crate::draft::{metrics, Draft};

/// A pattern applies to a journey when it is active and either carries no
/// segments or shares at least one with the journey.
pub fn is_relevant(pattern: &SuccessPattern, journey_segments: &[String]) -> bool {
    if !pattern.is_active {
        return false;
    }
    pattern.client_segments.is_empty()
        || pattern
            .client_segments
            .iter()
            .any(|s| journey_segments.contains(&s.trim().to_lowercase()))
}

/// Expected lift from moving this session onto the pattern.
pub fn expected_lift(pattern: &SuccessPattern, journey: &ActiveClientJourney) -> f64 {
    (pattern.success_rate - journey.conversion_probability) * pattern.confidence_score
}

/// How close the session's current content already is to the pattern.
/// 0.0 when nothing comparable is shown.
pub fn current_content_similarity(pattern: &SuccessPattern, current: &CurrentContent) -> f64 {
    let mut scores = Vec::with_capacity(2);
    if let (Some(hp), Some(hc)) = (pattern.pattern_data.hypothesis(), current.hypothesis.as_deref()) {
        scores.push(text_similarity(hp, hc));
    }
    if let (Some(ep), Some(ec)) = (pattern.pattern_data.elements(), current.elements.as_ref()) {
        if let Some(s) = content_similarity(ep, ec) {
            scores.push(s);
        }
    }
    pulse_stats::mean(&scores)
}

fn describe(pattern: &SuccessPattern) -> String {
    if let Some(h) = pattern.pattern_data.hypothesis() {
        return format!("\"{h}\"");
    }
    if let Some(e) = pattern.pattern_data.elements() {
        if let Some(headline) = &e.headline {
            return format!("headline \"{headline}\"");
        }
        let n = e.elements().len();
        return format!("{n} proven content elements");
    }
    format!("pattern {}", pattern.id)
}

/// Content swaps for content-bearing patterns and timing adjustments for
/// timing-bearing ones. `patterns` should be sorted best first.
pub fn pattern_drafts(
    config: &RecommendationConfig,
    journey: &ActiveClientJourney,
    patterns: &[SuccessPattern],
) -> Vec<Draft> {
    let segments = journey.segments();
    let mut drafts = Vec::new();
    for pattern in patterns {
        if pattern.confidence_score < config.min_pattern_confidence || !is_relevant(pattern, &segments) {
            continue;
        }
        let lift = expected_lift(pattern, journey);

        let carries_content =
            pattern.pattern_data.hypothesis().is_some() || pattern.pattern_data.elements().is_some();
        if carries_content
            && current_content_similarity(pattern, &journey.current_content) < config.content_swap_similarity
        {
            let priority = if pattern.confidence_score >= 0.85 {
                RecommendationPriority::High
            } else {
                RecommendationPriority::Medium
            };
            drafts.push(Draft {
                kind: RecommendationType::ContentSwap,
                priority,
                urgency: Urgency::Soon,
                title: format!("Swap content toward {}", describe(pattern)),
                text: format!(
                    "{} converted {:.0}% of {} similar journeys (confidence {:.2}).",
                    describe(pattern),
                    pattern.success_rate * 100.0,
                    pattern.sample_size,
                    pattern.confidence_score
                ),
                based_on_patterns: vec![pattern.id.clone()],
                directive: ImplementationDirective::SwapContent {
                    hypothesis: pattern.pattern_data.hypothesis().map(str::to_string),
                    elements: pattern.pattern_data.elements().cloned(),
                },
                monitoring_metrics: metrics(&["conversion_probability", "engagement_score"]),
                expected_impact: lift,
            });
        }

        if let Some(timing) = pattern.pattern_data.timing() {
            let follow_up = timing
                .avg_time_to_payment_secs
                .or(timing.avg_engagement_duration_secs);
            if let Some(follow_up_after_secs) = follow_up {
                let priority = if pattern.pattern_type() == PatternType::Timing {
                    RecommendationPriority::Medium
                } else {
                    RecommendationPriority::Low
                };
                drafts.push(Draft {
                    kind: RecommendationType::Timing,
                    priority,
                    urgency: Urgency::Scheduled,
                    title: format!(
                        "Follow up after about {:.0} minutes",
                        follow_up_after_secs / 60.0
                    ),
                    text: format!(
                        "Successful journeys like this one paid about {:.0} minutes in; time the next touchpoint accordingly.",
                        follow_up_after_secs / 60.0
                    ),
                    based_on_patterns: vec![pattern.id.clone()],
                    directive: ImplementationDirective::AdjustTiming {
                        follow_up_after_secs,
                        target_engagement_secs: timing.avg_engagement_duration_secs,
                    },
                    monitoring_metrics: metrics(&["time_to_payment", "engagement_duration"]),
                    expected_impact: lift,
                });
            }
        }
    }
    drafts
}

/// A/B test suggestions for strong, significant, well-sampled patterns.
pub fn ab_test_drafts(
    config: &RecommendationConfig,
    journey: &ActiveClientJourney,
    patterns: &[SuccessPattern],
) -> Vec<Draft> {
    let segments = journey.segments();
    patterns
        .iter()
        .filter(|p| {
            p.confidence_score > config.ab_test_min_confidence
                && p.sample_size >= config.ab_test_min_sample_size
                && p.statistical_significance <= config.ab_test_max_p_value
                && is_relevant(p, &segments)
        })
        .take(config.max_ab_tests_per_update)
        .map(|p| Draft {
            kind: RecommendationType::AbTest,
            priority: RecommendationPriority::Medium,
            urgency: Urgency::Scheduled,
            title: format!("A/B test {}", describe(p)),
            text: format!(
                "Run {} against the current version (p = {:.3}, n = {}).",
                describe(p),
                p.statistical_significance,
                p.sample_size
            ),
            based_on_patterns: vec![p.id.clone()],
            directive: ImplementationDirective::StartAbTest {
                variant_pattern_id: p.id.clone(),
                control_version_id: journey.current_content.version_id.clone(),
                traffic_split: 0.5,
            },
            monitoring_metrics: metrics(&["variant_conversion_rate", "p_value"]),
            expected_impact: expected_lift(p, journey) * 0.5,
        })
        .collect()
}
