//! Intervention triggers: signals that a session needs attention right now.

use pulse_core::config::RecommendationConfig;
use pulse_core::models::{
    ActiveClientJourney, ImplementationDirective, RecommendationPriority, RecommendationType, Urgency,
};

use crate::draft::{metrics, Draft};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    LongTimeOnPage,
    LowEngagement,
    HighDropOffRisk,
    Hesitation,
}

impl Trigger {
    pub fn name(self) -> &'static str {
        match self {
            Self::LongTimeOnPage => "long-time-on-page",
            Self::LowEngagement => "low-engagement",
            Self::HighDropOffRisk => "high-drop-off-risk",
            Self::Hesitation => "hesitation",
        }
    }
}

/// Triggers firing for `journey`. `hesitating` is decided by the caller,
/// which knows the previous update for the session.
pub fn active_triggers(
    config: &RecommendationConfig,
    journey: &ActiveClientJourney,
    hesitating: bool,
) -> Vec<Trigger> {
    let mut triggers = Vec::new();
    if journey.time_on_page_secs > config.long_time_on_page_secs {
        triggers.push(Trigger::LongTimeOnPage);
    }
    if journey.engagement_score < config.low_engagement_threshold {
        triggers.push(Trigger::LowEngagement);
    }
    if journey.drop_off_risk > config.high_drop_off_risk {
        triggers.push(Trigger::HighDropOffRisk);
    }
    if hesitating {
        triggers.push(Trigger::Hesitation);
    }
    triggers
}

/// Popup copy for a page, keyed on what the page is about.
fn page_copy(page: &str) -> (&'static str, &'static str) {
    let page = page.to_lowercase();
    if page.contains("pricing") {
        (
            "Questions about pricing?",
            "Offer a quick walkthrough of the plans and what each includes.",
        )
    } else if page.contains("checkout") || page.contains("payment") {
        (
            "Need a hand finishing up?",
            "Offer direct help completing payment and restate the guarantee.",
        )
    } else if page.contains("proposal") || page.contains("contract") {
        (
            "Anything unclear in the proposal?",
            "Offer a short call to walk through scope and next steps.",
        )
    } else {
        (
            "Can we help?",
            "Offer a short, relevant answer to the question this page raises.",
        )
    }
}

pub fn intervention_drafts(
    config: &RecommendationConfig,
    journey: &ActiveClientJourney,
    hesitating: bool,
) -> Vec<Draft> {
    let (headline, body) = page_copy(&journey.current_page);
    active_triggers(config, journey, hesitating)
        .into_iter()
        .map(|trigger| {
            let (priority, impact, title, text) = match trigger {
                Trigger::HighDropOffRisk => (
                    RecommendationPriority::Critical,
                    0.2 * journey.drop_off_risk,
                    format!("Drop-off risk on {}", journey.current_page),
                    format!(
                        "Drop-off risk is {:.0}%. Reach out before the session ends.",
                        journey.drop_off_risk * 100.0
                    ),
                ),
                Trigger::LongTimeOnPage => (
                    RecommendationPriority::High,
                    0.12,
                    format!("Extended time on {}", journey.current_page),
                    format!(
                        "Client has spent {:.0} minutes on this page.",
                        journey.time_on_page_secs / 60.0
                    ),
                ),
                Trigger::Hesitation => (
                    RecommendationPriority::High,
                    0.08,
                    format!("Hesitation on {}", journey.current_page),
                    "Client keeps returning to the same page without moving forward.".to_string(),
                ),
                Trigger::LowEngagement => (
                    RecommendationPriority::Medium,
                    0.1,
                    format!("Low engagement on {}", journey.current_page),
                    format!(
                        "Engagement score is {:.2}. Surface a more direct call to action.",
                        journey.engagement_score
                    ),
                ),
            };
            Draft {
                kind: RecommendationType::Intervention,
                priority,
                urgency: Urgency::Immediate,
                title,
                text,
                based_on_patterns: Vec::new(),
                directive: ImplementationDirective::ShowPopup {
                    page: journey.current_page.clone(),
                    headline: headline.to_string(),
                    body: body.to_string(),
                },
                monitoring_metrics: metrics(&["time_on_page", "drop_off_risk", trigger.name()]),
                expected_impact: impact,
            }
        })
        .collect()
}
