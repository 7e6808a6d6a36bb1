//! Result payloads returned by the detection, update, and fan-out paths.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pattern::SuccessPattern;
use crate::tags;

/// Output of a batch analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternDetectionResult {
    pub patterns: Vec<SuccessPattern>,
    pub outcomes_analyzed: usize,
    pub groups_found: usize,
    pub average_confidence: f64,
    /// Patterns with confidence above 0.8.
    pub high_confidence_count: usize,
    pub recommendations: Vec<String>,
    pub processing_time_ms: u64,
}

impl PatternDetectionResult {
    /// Empty result, used when analysis fails or finds nothing.
    pub fn empty(outcomes_analyzed: usize, processing_time_ms: u64) -> Self {
        Self {
            outcomes_analyzed,
            processing_time_ms,
            ..Default::default()
        }
    }
}

/// Binomial confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WilsonInterval {
    pub lower: f64,
    pub upper: f64,
    pub center: f64,
}

impl WilsonInterval {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTrend {
    Improving,
    Declining,
    Stable,
}

impl ConfidenceTrend {
    pub fn name(self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
        }
    }
}

impl fmt::Display for ConfidenceTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One point in a pattern's confidence history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceHistoryEntry {
    pub confidence: f64,
    pub success_rate: f64,
    pub sample_size: u32,
    pub recorded_at: DateTime<Utc>,
}

/// A neighbouring pattern in a similarity cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarPattern {
    pub pattern_id: String,
    pub similarity: f64,
}

/// Outcome of one incremental confidence update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicUpdateResult {
    pub pattern_id: String,
    pub previous_confidence: f64,
    pub new_confidence: f64,
    pub confidence_change: f64,
    pub wilson_interval: WilsonInterval,
    pub consistency: f64,
    /// Signed pull toward the cluster average, already scaled by cluster influence.
    pub similarity_adjustment: f64,
    pub trend: ConfidenceTrend,
    pub sample_size: u32,
    pub success_rate: f64,
    pub updated_at: DateTime<Utc>,
}

/// Fan-out payload describing which patterns changed and who is affected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternUpdateResult {
    pub updated_patterns: Vec<SuccessPattern>,
    pub new_patterns: Vec<SuccessPattern>,
    pub confidence_updates: Vec<DynamicUpdateResult>,
    pub affected_clients: Vec<String>,
    /// Extra tags to invalidate beyond those derived from patterns and clients.
    pub affected_tags: Vec<String>,
}

impl PatternUpdateResult {
    pub fn is_empty(&self) -> bool {
        self.updated_patterns.is_empty() && self.new_patterns.is_empty()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &SuccessPattern> {
        self.updated_patterns.iter().chain(self.new_patterns.iter())
    }

    /// Every tag touched by this update: explicit tags, pattern tags and client tags.
    pub fn all_tags(&self) -> BTreeSet<String> {
        let mut out: BTreeSet<String> = self.affected_tags.iter().cloned().collect();
        for pattern in self.patterns() {
            out.extend(pattern.tags());
        }
        out.extend(self.affected_clients.iter().map(|c| tags::client_tag(c)));
        out
    }
}
