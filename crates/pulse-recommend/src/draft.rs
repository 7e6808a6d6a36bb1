//! A recommendation before it is stamped with id, session and expiry.

use chrono::{DateTime, Duration, Utc};
use pulse_core::models::{
    ActiveClientJourney, ImplementationDirective, RealTimeRecommendation, RecommendationPriority,
    RecommendationType, Urgency,
};

#[derive(Debug, Clone)]
pub struct Draft {
    pub kind: RecommendationType,
    pub priority: RecommendationPriority,
    pub urgency: Urgency,
    pub title: String,
    pub text: String,
    pub based_on_patterns: Vec<String>,
    pub directive: ImplementationDirective,
    pub monitoring_metrics: Vec<String>,
    pub expected_impact: f64,
}

impl Draft {
    pub fn finish(
        self,
        journey: &ActiveClientJourney,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> RealTimeRecommendation {
        RealTimeRecommendation {
            id: uuid::Uuid::new_v4().to_string(),
            client_id: journey.client_id.clone(),
            session_id: journey.session_id.clone(),
            recommendation_type: self.kind,
            priority: self.priority,
            urgency: self.urgency,
            title: self.title,
            recommendation: self.text,
            based_on_patterns: self.based_on_patterns,
            directive: self.directive,
            monitoring_metrics: self.monitoring_metrics,
            expected_impact: self.expected_impact,
            generated_at: now,
            expires_at: now + ttl,
        }
    }
}

pub(crate) fn metrics(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
