use super::error_code::{self, PulseErrorCode};

/// Errors that can occur while detecting patterns.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("invalid outcome for client {client_id}: {reason}")]
    InvalidOutcome { client_id: String, reason: String },

    #[error("pattern invariant violated for {pattern_id}: {reason}")]
    InvalidPattern { pattern_id: String, reason: String },
}

impl PulseErrorCode for DetectionError {
    fn error_code(&self) -> &'static str {
        error_code::DETECTION_ERROR
    }
}
