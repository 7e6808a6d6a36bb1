//! Deduplicate, filter, order, and cap a batch of drafts.

use std::collections::HashSet;

use crate::draft::Draft;

/// Keeps the first draft per `(type, title)`, drops drafts whose expected
/// impact does not exceed `min_impact`, orders by priority then impact
/// (both descending), and keeps at most `max`.
pub fn rank(drafts: Vec<Draft>, min_impact: f64, max: usize) -> Vec<Draft> {
    let mut seen = HashSet::new();
    let mut kept: Vec<Draft> = drafts
        .into_iter()
        .filter(|d| seen.insert((d.kind, d.title.clone())))
        .filter(|d| d.expected_impact > min_impact)
        .collect();
    kept.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.expected_impact.total_cmp(&a.expected_impact))
    });
    kept.truncate(max);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::models::{
        ImplementationDirective, RecommendationPriority, RecommendationType, Urgency,
    };

    fn draft(kind: RecommendationType, priority: RecommendationPriority, title: &str, impact: f64) -> Draft {
        Draft {
            kind,
            priority,
            urgency: Urgency::Soon,
            title: title.to_string(),
            text: String::new(),
            based_on_patterns: Vec::new(),
            directive: ImplementationDirective::Personalize {
                dimension: "d".into(),
                value: "v".into(),
                strategy: "s".into(),
            },
            monitoring_metrics: Vec::new(),
            expected_impact: impact,
        }
    }

    #[test]
    fn dedups_filters_sorts_and_truncates() {
        use RecommendationPriority::*;
        use RecommendationType::*;
        let drafts = vec![
            draft(ContentSwap, Medium, "a", 0.3),
            draft(ContentSwap, Medium, "a", 0.9),
            draft(Timing, Medium, "a", 0.4),
            draft(Intervention, Critical, "b", 0.1),
            draft(AbTest, High, "c", 0.04),
            draft(Personalization, Low, "d", 0.5),
        ];
        let ranked = rank(drafts, 0.05, 3);
        let order: Vec<(RecommendationType, f64)> =
            ranked.iter().map(|d| (d.kind, d.expected_impact)).collect();
        assert_eq!(order, vec![(Intervention, 0.1), (Timing, 0.4), (ContentSwap, 0.3)]);
    }
}
