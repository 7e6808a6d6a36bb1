//! # pulse-dynamic
//!
//! Dynamic confidence updater. Folds a single new outcome into an existing
//! pattern without re-running detection: counts are incremented, consistency
//! is recomputed over a short trailing window, the Wilson interval bounds the
//! result, and similar patterns pull the score slightly toward their mean.
//!
//! Per-pattern history and clusters live in `DashMap`s. Read-modify-write
//! for one pattern id is serialized by a per-id mutex.

pub mod similarity;
pub mod updater;

pub use similarity::pattern_similarity;
pub use updater::DynamicConfidenceUpdater;
