//! # pulse-core
//!
//! Foundation crate for the Pulse pattern engine.
//! Defines the models, traits, errors, config, events, and similarity
//! helpers shared by every other crate in the workspace.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod models;
pub mod similarity;
pub mod tags;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::PulseConfig;
pub use errors::{PulseError, PulseResult};
pub use events::{EventDispatcher, PatternEventHandler};
pub use models::{
    ActiveClientJourney, ContentElements, ContentOutcomeData, DynamicUpdateResult, Outcome,
    PatternData, PatternType, PatternUpdateResult, RealTimeRecommendation, SuccessPattern,
};
pub use traits::{Clock, OutcomeStore};
