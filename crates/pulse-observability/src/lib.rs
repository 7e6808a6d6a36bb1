//! # pulse-observability
//!
//! Structured logging setup, span macros for the engine's hot operations,
//! and the health snapshot the runtime reports.

pub mod health;
pub mod tracing_setup;

pub use health::{HealthIssue, HealthSnapshot, HealthStatus};
pub use tracing_setup::init_tracing;
