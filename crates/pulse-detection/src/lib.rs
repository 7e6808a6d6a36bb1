//! # pulse-detection
//!
//! Pattern detection engine.
//!
//! ```text
//! outcomes ─▶ greedy similarity grouping ─▶ groups with ≥ min successes
//!          ─▶ hypothesis / content / timing extraction ─▶ mixed composition
//!          ─▶ confidence + significance scoring ─▶ threshold filter
//! ```
//!
//! The batch path (`analyze_outcomes`) and the incremental path
//! (`process_new_outcome`) share the same extraction. Neither returns an
//! error: failures are logged, reported as `analysis_failed` events, and
//! produce an empty result.

pub mod engine;
pub mod extraction;
pub mod grouping;

pub use engine::PatternDetectionEngine;
pub use grouping::{group_outcomes, OutcomeGroup};
