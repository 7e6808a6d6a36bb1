use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

/// Dashboard alert raised for a client session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternAlert {
    pub id: String,
    pub client_id: String,
    pub severity: AlertSeverity,
    /// Trigger headline; one live alert per title per client.
    pub title: String,
    pub message: String,
    pub pattern_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl PatternAlert {
    /// Older than `ttl` at `now`. Alerts stamped in the future never expire.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match (now - self.created_at).to_std() {
            Ok(age) => age >= ttl,
            Err(_) => false,
        }
    }
}
