use super::error_code::{self, PulseErrorCode};

/// Errors surfaced by `OutcomeStore` implementations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("read failed: {reason}")]
    ReadFailed { reason: String },

    #[error("write failed for pattern {pattern_id}: {reason}")]
    WriteFailed { pattern_id: String, reason: String },

    #[error("store lock poisoned")]
    LockPoisoned,
}

impl PulseErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        error_code::STORAGE_ERROR
    }
}
