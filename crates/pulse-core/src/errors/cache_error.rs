use super::error_code::{self, PulseErrorCode};

/// Cache manager errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to size cache value for {key}: {reason}")]
    Sizing { key: String, reason: String },

    #[error("cache manager has been disposed")]
    Disposed,

    #[error("maintenance requires a tokio runtime: {reason}")]
    NoRuntime { reason: String },
}

impl PulseErrorCode for CacheError {
    fn error_code(&self) -> &'static str {
        error_code::CACHE_ERROR
    }
}
