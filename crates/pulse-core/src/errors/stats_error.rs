use super::error_code::{self, PulseErrorCode};

/// Input validation errors raised by the statistics functions.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("success count {success_count} exceeds total attempts {total_attempts}")]
    SuccessExceedsTotal {
        success_count: u64,
        total_attempts: u64,
    },

    #[error("consistency score {value} outside [0, 1]")]
    ConsistencyOutOfRange { value: f64 },

    #[error("{name} = {value} is not a valid probability")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("confidence level {level} must lie strictly between 0 and 1")]
    InvalidConfidenceLevel { level: f64 },
}

impl PulseErrorCode for StatsError {
    fn error_code(&self) -> &'static str {
        error_code::STATS_ERROR
    }
}
