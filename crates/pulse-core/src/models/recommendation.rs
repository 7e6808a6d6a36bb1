use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::outcome::ContentElements;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationType {
    Intervention,
    ContentSwap,
    Timing,
    AbTest,
    Personalization,
}

impl RecommendationType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Intervention => "intervention",
            Self::ContentSwap => "content-swap",
            Self::Timing => "timing",
            Self::AbTest => "ab-test",
            Self::Personalization => "personalization",
        }
    }
}

impl fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered low → critical, so `max` picks the most pressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Immediate,
    Soon,
    Scheduled,
}

/// What the notification layer should do to apply a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ImplementationDirective {
    ShowPopup {
        page: String,
        headline: String,
        body: String,
    },
    SwapContent {
        hypothesis: Option<String>,
        elements: Option<ContentElements>,
    },
    AdjustTiming {
        follow_up_after_secs: f64,
        target_engagement_secs: Option<f64>,
    },
    StartAbTest {
        variant_pattern_id: String,
        control_version_id: Option<String>,
        traffic_split: f64,
    },
    Personalize {
        dimension: String,
        value: String,
        strategy: String,
    },
}

/// An actionable, time-bounded suggestion for one client session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealTimeRecommendation {
    pub id: String,
    pub client_id: String,
    pub session_id: String,
    pub recommendation_type: RecommendationType,
    pub priority: RecommendationPriority,
    pub urgency: Urgency,
    pub title: String,
    pub recommendation: String,
    pub based_on_patterns: Vec<String>,
    pub directive: ImplementationDirective,
    pub monitoring_metrics: Vec<String>,
    /// Expected lift in conversion probability.
    pub expected_impact: f64,
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl RealTimeRecommendation {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
