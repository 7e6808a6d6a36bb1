//! Stable string codes attached to every error, for log aggregation.

pub const STATS_ERROR: &str = "STATS_ERROR";
pub const CACHE_ERROR: &str = "CACHE_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const DETECTION_ERROR: &str = "DETECTION_ERROR";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
pub const RUNTIME_ERROR: &str = "RUNTIME_ERROR";

/// Maps an error to its stable code.
pub trait PulseErrorCode {
    fn error_code(&self) -> &'static str;
}
