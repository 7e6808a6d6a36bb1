use std::collections::HashMap;

use pulse_core::models::PatternData;

use super::Candidate;
use crate::grouping::OutcomeGroup;

/// Most frequent hypothesis among the group's successes, compared
/// case-insensitively. Ties go to the first one seen. Returns the text as
/// first written and its count.
pub fn dominant_hypothesis<'a>(group: &OutcomeGroup<'a>) -> Option<(&'a str, usize)> {
    let mut counts: HashMap<String, (usize, usize, &'a str)> = HashMap::new();
    for (order, text) in group.successes().filter_map(|o| o.hypothesis_text()).enumerate() {
        counts
            .entry(text.to_lowercase())
            .and_modify(|(count, _, _)| *count += 1)
            .or_insert((1, order, text));
    }
    counts
        .into_values()
        .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1)))
        .map(|(count, _, text)| (text, count))
}

/// Consistency is how far the group's success rate sits from a coin flip.
pub fn extract_hypothesis(group: &OutcomeGroup<'_>, min_samples: usize) -> Option<Candidate> {
    let (text, count) = dominant_hypothesis(group)?;
    if count < min_samples {
        return None;
    }
    Some(Candidate {
        data: PatternData::Hypothesis {
            hypothesis: text.to_string(),
        },
        consistency: ((group.success_rate() - 0.5).abs() * 2.0).clamp(0.0, 1.0),
    })
}
