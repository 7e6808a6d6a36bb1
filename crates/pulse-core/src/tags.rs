//! Cache tag and key conventions shared by producers and the cache manager.

use crate::models::PatternType;

pub fn pattern_tag(pattern_id: &str) -> String {
    format!("pattern:{pattern_id}")
}

pub fn client_tag(client_id: &str) -> String {
    format!("client:{client_id}")
}

pub fn type_tag(pattern_type: PatternType) -> String {
    format!("type:{}", pattern_type.name())
}

pub fn segment_tag(segment: &str) -> String {
    format!("segment:{}", segment.trim().to_lowercase())
}

/// Cache key for a pattern entry.
pub fn pattern_key(pattern_id: &str) -> String {
    format!("pattern:{pattern_id}")
}

/// Cache key for a client's alert list.
pub fn alerts_key(client_id: &str) -> String {
    format!("alerts:{client_id}")
}

/// Cache key for a client's recommendation list.
pub fn recommendations_key(client_id: &str) -> String {
    format!("recommendations:{client_id}")
}
