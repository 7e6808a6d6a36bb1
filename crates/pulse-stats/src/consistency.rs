use pulse_core::constants::MAX_BERNOULLI_VARIANCE;

/// Outcome consistency: `1 − variance / 0.25`.
///
/// The variance of a boolean series around its own mean peaks at 0.25 for a
/// 50/50 split, so alternating outcomes score 0 and uniform outcomes score 1.
/// Empty and single-element inputs are trivially consistent.
pub fn calculate_consistency_score(outcomes: &[bool]) -> f64 {
    if outcomes.len() <= 1 {
        return 1.0;
    }
    let n = outcomes.len() as f64;
    let p = outcomes.iter().filter(|&&o| o).count() as f64 / n;
    let variance = outcomes
        .iter()
        .map(|&o| {
            let x = if o { 1.0 } else { 0.0 };
            (x - p) * (x - p)
        })
        .sum::<f64>()
        / n;
    (1.0 - variance / MAX_BERNOULLI_VARIANCE).clamp(0.0, 1.0)
}
