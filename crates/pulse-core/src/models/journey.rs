use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::outcome::ContentElements;

/// Content currently shown in a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentContent {
    pub version_id: Option<String>,
    pub hypothesis: Option<String>,
    pub elements: Option<ContentElements>,
}

/// One tracked interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyInteraction {
    pub kind: String,
    pub page: String,
    pub at: DateTime<Utc>,
}

/// Snapshot of an in-progress client session. Ephemeral, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveClientJourney {
    pub client_id: String,
    pub session_id: String,
    pub current_page: String,
    pub time_on_page_secs: f64,
    /// Cumulative engagement in [0, 1].
    pub engagement_score: f64,
    pub current_content: CurrentContent,
    pub client_segment: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub interaction_history: Vec<JourneyInteraction>,
    pub drop_off_risk: f64,
    pub conversion_probability: f64,
    pub updated_at: DateTime<Utc>,
}

impl ActiveClientJourney {
    pub fn new(
        client_id: impl Into<String>,
        session_id: impl Into<String>,
        current_page: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            session_id: session_id.into(),
            current_page: current_page.into(),
            time_on_page_secs: 0.0,
            engagement_score: 0.5,
            current_content: CurrentContent::default(),
            client_segment: None,
            industry: None,
            company_size: None,
            interaction_history: Vec::new(),
            drop_off_risk: 0.0,
            conversion_probability: 0.5,
            updated_at,
        }
    }

    /// Segment labels this journey belongs to (segment, industry, size).
    pub fn segments(&self) -> Vec<String> {
        [&self.client_segment, &self.industry, &self.company_size]
            .into_iter()
            .flatten()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
