//! Error handling for Pulse.
//! One error enum per subsystem, `thiserror` only, aggregated by `PulseError`.

pub mod cache_error;
pub mod config_error;
pub mod detection_error;
pub mod error_code;
pub mod stats_error;
pub mod storage_error;

pub use cache_error::CacheError;
pub use config_error::ConfigError;
pub use detection_error::DetectionError;
pub use error_code::PulseErrorCode;
pub use stats_error::StatsError;
pub use storage_error::StorageError;

/// Top-level error for every fallible Pulse operation.
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    #[error("statistics error: {0}")]
    Stats(#[from] StatsError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("detection error: {0}")]
    Detection(#[from] DetectionError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl PulseErrorCode for PulseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Stats(e) => e.error_code(),
            Self::Cache(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Detection(e) => e.error_code(),
            Self::Validation(_) => error_code::VALIDATION_ERROR,
            Self::Serialization(_) => error_code::SERIALIZATION_ERROR,
            Self::Runtime(_) => error_code::RUNTIME_ERROR,
        }
    }
}

pub type PulseResult<T> = Result<T, PulseError>;
