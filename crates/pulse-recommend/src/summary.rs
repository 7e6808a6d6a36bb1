//! Plain-text recommendation lines for batch analysis results.

use pulse_core::constants::HIGH_CONFIDENCE;
use pulse_core::models::{PatternData, SuccessPattern};

const MAX_LINES: usize = 5;

/// One line per strong pattern (best first, at most five), plus a note
/// about weaker patterns that still need data.
pub fn recommendations_for_patterns(patterns: &[SuccessPattern]) -> Vec<String> {
    if patterns.is_empty() {
        return vec![
            "No reliable patterns yet; keep collecting outcomes before changing content.".to_string(),
        ];
    }

    let mut ranked: Vec<&SuccessPattern> = patterns.iter().collect();
    ranked.sort_by(|a, b| b.confidence_score.total_cmp(&a.confidence_score));

    let (strong, weak): (Vec<&SuccessPattern>, Vec<&SuccessPattern>) = ranked
        .into_iter()
        .partition(|p| p.confidence_score > HIGH_CONFIDENCE);

    let mut lines: Vec<String> = strong.iter().take(MAX_LINES).map(|p| line_for(p)).collect();
    if !weak.is_empty() {
        lines.push(format!(
            "Validate {} emerging pattern{} with more outcomes before rolling out.",
            weak.len(),
            if weak.len() == 1 { "" } else { "s" }
        ));
    }
    lines
}

fn line_for(pattern: &SuccessPattern) -> String {
    let evidence = format!(
        "{:.0}% success over {} outcomes, confidence {:.2}",
        pattern.success_rate * 100.0,
        pattern.sample_size,
        pattern.confidence_score
    );
    match &pattern.pattern_data {
        PatternData::Hypothesis { hypothesis } => {
            format!("Apply \"{hypothesis}\" more widely ({evidence}).")
        }
        PatternData::ContentElement { elements } => {
            let names: Vec<String> = elements.elements().into_iter().map(|e| e.value).collect();
            format!("Reuse content elements [{}] ({evidence}).", names.join(", "))
        }
        PatternData::Timing { profile } => match profile.avg_time_to_payment_secs {
            Some(secs) => format!(
                "Time follow-ups around {:.0} minutes into the journey ({evidence}).",
                secs / 60.0
            ),
            None => format!("Keep the current engagement cadence ({evidence})."),
        },
        PatternData::Mixed { components, .. } => {
            let names: Vec<&str> = components.iter().map(|c| c.name()).collect();
            format!("Combine the {} signals together ({evidence}).", names.join(" + "))
        }
    }
}
