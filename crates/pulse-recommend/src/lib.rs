//! # pulse-recommend
//!
//! Real-time recommendation engine. Each journey update is checked for
//! intervention triggers, matched against the locally cached patterns, and
//! turned into at most a handful of ranked, expiring recommendations.
//!
//! `summary` produces the plain-text recommendation lines attached to batch
//! analysis results.

pub mod draft;
pub mod engine;
pub mod handler;
pub mod interventions;
pub mod patterns;
pub mod personalization;
pub mod ranking;
pub mod summary;

pub use engine::RealtimeRecommendationEngine;
pub use handler::RecommendationRefreshHandler;
pub use summary::recommendations_for_patterns;
