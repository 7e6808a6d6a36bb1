//! # pulse-engine
//!
//! `PulseRuntime` owns one instance of every Pulse component and wires them
//! to a single [`EventDispatcher`](pulse_core::EventDispatcher):
//!
//! ```text
//! record_outcome ─▶ dynamic updater ─▶ store ─▶ detection (incremental)
//!                         │
//!                         └─▶ patterns_updated ─▶ cache invalidation
//!                                              └─▶ recommendation refresh
//! ```

pub mod query;
pub mod record;
pub mod runtime;

pub use query::PatternQuery;
pub use runtime::PulseRuntime;
