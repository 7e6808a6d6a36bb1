//! # pulse-cache
//!
//! Pattern cache manager: four independently sized LRU segments (patterns,
//! alerts, recommendations, query results) backed by `moka::sync::Cache`.
//!
//! Every entry carries its own TTL and tag set. Expiry is checked lazily on
//! `get` against the injected [`pulse_core::Clock`] and swept periodically by
//! the maintenance task. Pattern updates invalidate derived keys using the
//! configured strategy (`immediate`, `batch`, or `lazy`).

pub mod entry;
pub mod handler;
pub mod maintenance;
pub mod manager;
pub mod query;
pub mod segment;
pub mod stats;

pub use entry::{CacheEntry, CachePriority};
pub use handler::CacheInvalidationHandler;
pub use manager::PatternCacheManager;
pub use query::query_key;
pub use segment::SegmentKind;
pub use stats::CacheStats;
