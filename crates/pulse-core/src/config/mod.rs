//! Configuration system for Pulse.
//! TOML-based; resolution order: environment (`PULSE_*`) > config file > defaults.

pub mod cache_config;
pub mod defaults;
pub mod detection_config;
pub mod dynamic_config;
pub mod observability_config;
pub mod pulse_config;
pub mod recommendation_config;

pub use cache_config::{CacheConfig, InvalidationStrategy};
pub use detection_config::DetectionConfig;
pub use dynamic_config::DynamicConfig;
pub use observability_config::ObservabilityConfig;
pub use pulse_config::PulseConfig;
pub use recommendation_config::RecommendationConfig;
