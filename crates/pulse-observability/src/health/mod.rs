//! Runtime health: a point-in-time snapshot and the checks run over it.

mod snapshot;

pub use snapshot::{HealthIssue, HealthSnapshot, HealthStatus};
