use pulse_core::models::{PatternData, TimingFactors, TimingProfile};
use pulse_stats::{coefficient_of_variation, mean};

use super::Candidate;
use crate::grouping::OutcomeGroup;

/// Consistency when no duration was measured.
const NEUTRAL_CONSISTENCY: f64 = 0.5;

fn average<I: Iterator<Item = f64>>(values: I) -> Option<f64> {
    let values: Vec<f64> = values.collect();
    (!values.is_empty()).then(|| mean(&values))
}

/// Per-field averages over the samples that carry each field.
pub fn timing_profile(samples: &[&TimingFactors]) -> TimingProfile {
    TimingProfile {
        avg_time_to_payment_secs: average(samples.iter().filter_map(|t| t.time_to_payment_secs)),
        avg_engagement_duration_secs: average(samples.iter().filter_map(|t| t.engagement_duration_secs)),
        avg_page_views: average(samples.iter().filter_map(|t| t.page_views.map(f64::from))),
        avg_interaction_count: average(samples.iter().filter_map(|t| t.interaction_count.map(f64::from))),
        sample_count: samples.len() as u32,
    }
}

/// Consistency is `1 − CV` of time-to-payment, falling back to engagement
/// duration when no payment times were recorded.
pub fn extract_timing(group: &OutcomeGroup<'_>, min_samples: usize) -> Option<Candidate> {
    let samples: Vec<&TimingFactors> = group
        .successes()
        .filter_map(|o| o.timing_factors.as_ref())
        .filter(|t| t.has_any())
        .collect();
    if samples.len() < min_samples {
        return None;
    }

    let mut durations: Vec<f64> = samples.iter().filter_map(|t| t.time_to_payment_secs).collect();
    if durations.is_empty() {
        durations = samples.iter().filter_map(|t| t.engagement_duration_secs).collect();
    }
    let consistency = if durations.is_empty() {
        NEUTRAL_CONSISTENCY
    } else {
        (1.0 - coefficient_of_variation(&durations)).clamp(0.0, 1.0)
    };

    Some(Candidate {
        data: PatternData::Timing {
            profile: timing_profile(&samples),
        },
        consistency,
    })
}
