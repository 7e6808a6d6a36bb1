//! In-process observer registration for pattern lifecycle events.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::{EventDispatcher, HandlerId};
pub use handler::PatternEventHandler;
pub use types::*;
