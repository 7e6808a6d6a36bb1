//! Similarity measures shared by grouping, clustering, and recommendation.
//!
//! Every measure returns a value in [0, 1]. Composite measures average only
//! the factors present on both sides; a factor missing on either side neither
//! helps nor hurts.

use std::collections::HashSet;
use std::hash::Hash;

use crate::models::outcome::normalize;
use crate::models::{ContentElements, ContentOutcomeData, ContextFactors, SuccessPattern};

/// Exact Jaccard similarity `|A ∩ B| / |A ∪ B|`. Returns 0.0 if both sets are empty.
pub fn jaccard<T: Eq + Hash>(set_a: &HashSet<T>, set_b: &HashSet<T>) -> f64 {
    let union = set_a.union(set_b).count();
    if union == 0 {
        return 0.0;
    }
    set_a.intersection(set_b).count() as f64 / union as f64
}

/// Lowercased alphanumeric word tokens.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Word-level Jaccard similarity of two texts.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    jaccard(&tokenize(a), &tokenize(b))
}

fn normalized_set(values: &[String]) -> HashSet<String> {
    values.iter().map(|v| normalize(v)).filter(|v| !v.is_empty()).collect()
}

/// Similarity of two content sets, averaged over the slots both populate.
/// `None` when they share no populated slot.
pub fn content_similarity(a: &ContentElements, b: &ContentElements) -> Option<f64> {
    let mut scores = Vec::with_capacity(5);
    if let (Some(ha), Some(hb)) = (&a.headline, &b.headline) {
        scores.push(text_similarity(ha, hb));
    }
    if let (Some(pa), Some(pb)) = (&a.pricing, &b.pricing) {
        scores.push(if normalize(pa) == normalize(pb) { 1.0 } else { 0.0 });
    }
    for (la, lb) in [(&a.benefits, &b.benefits), (&a.features, &b.features), (&a.ctas, &b.ctas)] {
        if !la.is_empty() && !lb.is_empty() {
            scores.push(jaccard(&normalized_set(la), &normalized_set(lb)));
        }
    }
    mean(&scores)
}

/// Industry / client-size agreement. `None` when neither dimension is on both sides.
pub fn context_similarity(a: &ContextFactors, b: &ContextFactors) -> Option<f64> {
    let mut scores = Vec::with_capacity(2);
    for (x, y) in [(&a.industry, &b.industry), (&a.client_size, &b.client_size)] {
        if let (Some(x), Some(y)) = (x, y) {
            scores.push(if normalize(x) == normalize(y) { 1.0 } else { 0.0 });
        }
    }
    mean(&scores)
}

/// Pairwise outcome similarity used for grouping: equal-weight average of
/// hypothesis, content, and context similarity over the factors present.
pub fn outcome_similarity(a: &ContentOutcomeData, b: &ContentOutcomeData) -> f64 {
    let mut scores = Vec::with_capacity(3);
    if let (Some(ha), Some(hb)) = (a.hypothesis_text(), b.hypothesis_text()) {
        scores.push(text_similarity(ha, hb));
    }
    if let (Some(ca), Some(cb)) = (&a.content_elements, &b.content_elements) {
        if let Some(s) = content_similarity(ca, cb) {
            scores.push(s);
        }
    }
    if let (Some(xa), Some(xb)) = (&a.context_factors, &b.context_factors) {
        if let Some(s) = context_similarity(xa, xb) {
            scores.push(s);
        }
    }
    mean(&scores).unwrap_or(0.0)
}

/// How well an outcome matches an existing pattern's payload.
pub fn outcome_pattern_similarity(outcome: &ContentOutcomeData, pattern: &SuccessPattern) -> f64 {
    let mut scores = Vec::with_capacity(2);
    if let (Some(ho), Some(hp)) = (outcome.hypothesis_text(), pattern.pattern_data.hypothesis()) {
        scores.push(text_similarity(ho, hp));
    }
    if let (Some(co), Some(cp)) = (&outcome.content_elements, pattern.pattern_data.elements()) {
        if let Some(s) = content_similarity(co, cp) {
            scores.push(s);
        }
    }
    mean(&scores).unwrap_or(0.0)
}

fn mean(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}
