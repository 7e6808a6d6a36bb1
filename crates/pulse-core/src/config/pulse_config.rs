//! Top-level Pulse configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    CacheConfig, DetectionConfig, DynamicConfig, InvalidationStrategy, ObservabilityConfig,
    RecommendationConfig,
};
use crate::errors::ConfigError;

/// Aggregates all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`PULSE_*`)
/// 2. Config file passed to [`PulseConfig::load`]
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PulseConfig {
    pub detection: DetectionConfig,
    pub dynamic: DynamicConfig,
    pub cache: CacheConfig,
    pub recommendation: RecommendationConfig,
    pub observability: ObservabilityConfig,
}

impl PulseConfig {
    /// Load from an optional TOML file, then apply `PULSE_*` overrides, then validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|_| {
                    ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    }
                })?;
                toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?
            }
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from a TOML string. Missing keys take defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    ///
    /// Takes the lookup as a closure so tests don't have to mutate the
    /// process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PULSE_MIN_SAMPLE_SIZE") {
            self.detection.min_sample_size = parse_env("PULSE_MIN_SAMPLE_SIZE", &v)?;
        }
        if let Some(v) = lookup("PULSE_MIN_CONFIDENCE") {
            self.detection.min_confidence_threshold = parse_env("PULSE_MIN_CONFIDENCE", &v)?;
        }
        if let Some(v) = lookup("PULSE_CACHE_MAX_ENTRIES") {
            self.cache.max_entries = parse_env("PULSE_CACHE_MAX_ENTRIES", &v)?;
        }
        if let Some(v) = lookup("PULSE_INVALIDATION_STRATEGY") {
            self.cache.invalidation_strategy = match v.trim().to_lowercase().as_str() {
                "immediate" => InvalidationStrategy::Immediate,
                "batch" => InvalidationStrategy::Batch,
                "lazy" => InvalidationStrategy::Lazy,
                other => {
                    return Err(ConfigError::ValidationFailed {
                        field: "PULSE_INVALIDATION_STRATEGY".to_string(),
                        message: format!("unknown strategy '{other}'"),
                    })
                }
            };
        }
        if let Some(v) = lookup("PULSE_LOG_LEVEL") {
            self.observability.log_level = v;
        }
        Ok(())
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit_fields = [
            ("detection.min_confidence_threshold", self.detection.min_confidence_threshold),
            ("detection.similarity_threshold", self.detection.similarity_threshold),
            ("detection.content_element_threshold", self.detection.content_element_threshold),
            ("detection.mixed_pattern_threshold", self.detection.mixed_pattern_threshold),
            ("detection.null_hypothesis", self.detection.null_hypothesis),
            ("dynamic.cluster_similarity_threshold", self.dynamic.cluster_similarity_threshold),
            ("dynamic.cluster_influence", self.dynamic.cluster_influence),
            ("dynamic.outcome_match_threshold", self.dynamic.outcome_match_threshold),
            ("recommendation.min_pattern_confidence", self.recommendation.min_pattern_confidence),
            ("recommendation.content_swap_similarity", self.recommendation.content_swap_similarity),
            ("recommendation.ab_test_min_confidence", self.recommendation.ab_test_min_confidence),
            ("recommendation.ab_test_max_p_value", self.recommendation.ab_test_max_p_value),
            ("recommendation.low_engagement_threshold", self.recommendation.low_engagement_threshold),
            ("recommendation.high_drop_off_risk", self.recommendation.high_drop_off_risk),
        ];
        for (field, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }
        let level = self.dynamic.confidence_level;
        if !(level > 0.0 && level < 1.0) {
            return Err(ConfigError::ValidationFailed {
                field: "dynamic.confidence_level".to_string(),
                message: "must lie strictly between 0.0 and 1.0".to_string(),
            });
        }
        if self.detection.min_sample_size == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "detection.min_sample_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.cache.max_entries == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "cache.max_entries".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.dynamic.history_limit == 0 || self.dynamic.trend_window == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "dynamic.history_limit".to_string(),
                message: "history and trend windows must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::ValidationFailed {
        field: key.to_string(),
        message: format!("cannot parse '{value}'"),
    })
}
