use std::collections::HashMap;

use pulse_core::models::{ContentElement, ContentElementKind, ContentElements, PatternData};
use pulse_core::similarity::content_similarity;

use super::Candidate;
use crate::grouping::OutcomeGroup;

/// Elements present in at least `threshold` of `samples`, in first-seen order.
/// Each sample counts an element once.
pub fn shared_elements(samples: &[&ContentElements], threshold: f64) -> Vec<ContentElement> {
    let mut seen: Vec<(ContentElementKind, String)> = Vec::new();
    let mut first: HashMap<(ContentElementKind, String), (usize, ContentElement)> = HashMap::new();
    for sample in samples {
        let mut keys_in_sample = Vec::new();
        for element in sample.elements() {
            let key = element.key();
            if key.1.is_empty() || keys_in_sample.contains(&key) {
                continue;
            }
            keys_in_sample.push(key.clone());
            match first.get_mut(&key) {
                Some((count, _)) => *count += 1,
                None => {
                    seen.push(key.clone());
                    first.insert(key, (1, element));
                }
            }
        }
    }

    let needed = threshold * samples.len() as f64;
    seen.into_iter()
        .filter_map(|key| first.remove(&key))
        .filter(|(count, _)| *count as f64 >= needed)
        .map(|(_, element)| element)
        .collect()
}

/// Consistency is the mean pairwise content similarity of the samples.
pub fn extract_content(group: &OutcomeGroup<'_>, min_samples: usize, threshold: f64) -> Option<Candidate> {
    let samples: Vec<&ContentElements> = group
        .successes()
        .filter_map(|o| o.content_elements.as_ref())
        .filter(|c| !c.is_empty())
        .collect();
    if samples.len() < min_samples {
        return None;
    }

    let elements = shared_elements(&samples, threshold);
    if elements.is_empty() {
        return None;
    }

    let mut pair_scores = Vec::new();
    for (i, a) in samples.iter().enumerate() {
        for b in &samples[i + 1..] {
            if let Some(score) = content_similarity(a, b) {
                pair_scores.push(score);
            }
        }
    }
    let consistency = if pair_scores.is_empty() {
        0.0
    } else {
        pulse_stats::mean(&pair_scores)
    };

    Some(Candidate {
        data: PatternData::ContentElement {
            elements: ContentElements::from_elements(elements),
        },
        consistency: consistency.clamp(0.0, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(headline: &str, ctas: &[&str]) -> ContentElements {
        ContentElements {
            headline: Some(headline.to_string()),
            ctas: ctas.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn keeps_elements_above_the_share() {
        let a = content("Grow faster", &["Start trial"]);
        let b = content("grow faster", &["Start trial", "Book demo"]);
        let c = content("Save money", &["start trial"]);
        let shared = shared_elements(&[&a, &b, &c], 0.6);
        let rebuilt = ContentElements::from_elements(shared);
        assert_eq!(rebuilt.headline.as_deref(), Some("Grow faster"));
        assert_eq!(rebuilt.ctas, vec!["Start trial".to_string()]);
    }

    #[test]
    fn duplicates_within_a_sample_count_once() {
        let a = content("x", &["Go", "go"]);
        let b = content("y", &[]);
        let shared = shared_elements(&[&a, &b], 0.6);
        assert!(shared.is_empty());
    }
}
