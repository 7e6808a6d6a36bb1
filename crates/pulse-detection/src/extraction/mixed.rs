use pulse_core::constants::{MIXED_PATTERN_BONUS_CAP, MIXED_PATTERN_BONUS_PER_COMPONENT};
use pulse_core::models::{PatternData, PatternType, SuccessPattern};
use pulse_stats::mean;

/// Fold the components above `threshold` into one mixed payload when at
/// least two qualify.
///
/// Returns the payload with its confidence: the component average plus a
/// bonus of 0.02 per component, capped at 0.1.
pub fn compose_mixed(components: &[SuccessPattern], threshold: f64) -> Option<(PatternData, f64)> {
    let strong: Vec<&SuccessPattern> = components
        .iter()
        .filter(|p| p.pattern_type() != PatternType::Mixed && p.confidence_score > threshold)
        .collect();
    if strong.len() < 2 {
        return None;
    }

    let confidences: Vec<f64> = strong.iter().map(|p| p.confidence_score).collect();
    let bonus = (MIXED_PATTERN_BONUS_PER_COMPONENT * strong.len() as f64).min(MIXED_PATTERN_BONUS_CAP);
    let confidence = (mean(&confidences) + bonus).clamp(0.0, 1.0);

    let data = PatternData::Mixed {
        hypothesis: strong.iter().find_map(|p| p.pattern_data.hypothesis().map(str::to_string)),
        elements: strong.iter().find_map(|p| p.pattern_data.elements().cloned()),
        timing: strong.iter().find_map(|p| p.pattern_data.timing().cloned()),
        components: strong.iter().map(|p| p.pattern_type()).collect(),
    };
    Some((data, confidence))
}
