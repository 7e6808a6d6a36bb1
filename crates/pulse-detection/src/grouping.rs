//! Greedy single-pass grouping of outcomes by pairwise similarity.

use pulse_core::models::ContentOutcomeData;
use pulse_core::similarity::outcome_similarity;

/// Outcomes judged similar enough to share a pattern.
#[derive(Debug, Clone)]
pub struct OutcomeGroup<'a> {
    pub members: Vec<&'a ContentOutcomeData>,
}

impl<'a> OutcomeGroup<'a> {
    pub fn new(members: Vec<&'a ContentOutcomeData>) -> Self {
        Self { members }
    }

    pub fn total(&self) -> u64 {
        self.members.len() as u64
    }

    pub fn success_count(&self) -> u64 {
        self.successes().count() as u64
    }

    pub fn success_rate(&self) -> f64 {
        if self.members.is_empty() {
            0.0
        } else {
            self.success_count() as f64 / self.total() as f64
        }
    }

    pub fn successes(&self) -> impl Iterator<Item = &'a ContentOutcomeData> + '_ {
        self.members.iter().copied().filter(|o| o.outcome.is_success())
    }

    /// Lowercased industries and client sizes seen in the group, sorted.
    pub fn segments(&self) -> Vec<String> {
        let mut segments: Vec<String> = self
            .members
            .iter()
            .filter_map(|o| o.context_factors.as_ref())
            .flat_map(|c| [c.industry.as_deref(), c.client_size.as_deref()])
            .flatten()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        segments.sort();
        segments.dedup();
        segments
    }
}

/// Each unassigned outcome seeds a group and absorbs every later unassigned
/// outcome whose similarity to the seed exceeds `threshold`.
pub fn group_outcomes(outcomes: &[ContentOutcomeData], threshold: f64) -> Vec<OutcomeGroup<'_>> {
    let mut assigned = vec![false; outcomes.len()];
    let mut groups = Vec::new();
    for (i, seed) in outcomes.iter().enumerate() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;
        let mut members = vec![seed];
        for (j, candidate) in outcomes.iter().enumerate().skip(i + 1) {
            if !assigned[j] && outcome_similarity(seed, candidate) > threshold {
                assigned[j] = true;
                members.push(candidate);
            }
        }
        groups.push(OutcomeGroup::new(members));
    }
    groups
}
