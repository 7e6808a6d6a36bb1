//! Data model for outcomes, patterns, journeys, and recommendations.

pub mod alert;
pub mod journey;
pub mod outcome;
pub mod pattern;
pub mod recommendation;
pub mod results;

pub use alert::{AlertSeverity, PatternAlert};
pub use journey::{ActiveClientJourney, CurrentContent, JourneyInteraction};
pub use outcome::{
    ContentElement, ContentElementKind, ContentElements, ContentOutcomeData, ContextFactors,
    Outcome, OutcomeDataPoint, TimingFactors,
};
pub use pattern::{PatternData, PatternType, SuccessPattern, TimingProfile};
pub use recommendation::{
    ImplementationDirective, RealTimeRecommendation, RecommendationPriority, RecommendationType,
    Urgency,
};
pub use results::{
    ConfidenceHistoryEntry, ConfidenceTrend, DynamicUpdateResult, PatternDetectionResult,
    PatternUpdateResult, SimilarPattern, WilsonInterval,
};
