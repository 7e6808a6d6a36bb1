use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::outcome::ContentElements;
use crate::errors::{DetectionError, PulseError, PulseResult};
use crate::tags;

/// Kind of regularity a pattern captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternType {
    Hypothesis,
    ContentElement,
    Timing,
    Mixed,
}

impl PatternType {
    pub const ALL: [PatternType; 4] = [
        Self::Hypothesis,
        Self::ContentElement,
        Self::Timing,
        Self::Mixed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Hypothesis => "hypothesis",
            Self::ContentElement => "content-element",
            Self::Timing => "timing",
            Self::Mixed => "mixed",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PatternType {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| PulseError::Validation(format!("unknown pattern type: {s}")))
    }
}

/// Averaged timing factors across the samples that carried them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingProfile {
    pub avg_time_to_payment_secs: Option<f64>,
    pub avg_engagement_duration_secs: Option<f64>,
    pub avg_page_views: Option<f64>,
    pub avg_interaction_count: Option<f64>,
    pub sample_count: u32,
}

/// Variant payload of a pattern. The pattern type is derived from the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PatternData {
    Hypothesis {
        hypothesis: String,
    },
    ContentElement {
        elements: ContentElements,
    },
    Timing {
        profile: TimingProfile,
    },
    Mixed {
        hypothesis: Option<String>,
        elements: Option<ContentElements>,
        timing: Option<TimingProfile>,
        components: Vec<PatternType>,
    },
}

impl PatternData {
    pub fn pattern_type(&self) -> PatternType {
        match self {
            Self::Hypothesis { .. } => PatternType::Hypothesis,
            Self::ContentElement { .. } => PatternType::ContentElement,
            Self::Timing { .. } => PatternType::Timing,
            Self::Mixed { .. } => PatternType::Mixed,
        }
    }

    pub fn hypothesis(&self) -> Option<&str> {
        match self {
            Self::Hypothesis { hypothesis } => Some(hypothesis),
            Self::Mixed { hypothesis, .. } => hypothesis.as_deref(),
            _ => None,
        }
    }

    pub fn elements(&self) -> Option<&ContentElements> {
        match self {
            Self::ContentElement { elements } => Some(elements),
            Self::Mixed { elements, .. } => elements.as_ref(),
            _ => None,
        }
    }

    pub fn timing(&self) -> Option<&TimingProfile> {
        match self {
            Self::Timing { profile } => Some(profile),
            Self::Mixed { timing, .. } => timing.as_ref(),
            _ => None,
        }
    }

    /// Deterministic JSON used for id hashing. Struct fields serialize in
    /// declaration order, so equal payloads produce equal strings.
    pub fn canonical_json(&self) -> PulseResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A discovered, statistically supported regularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessPattern {
    pub id: String,
    pub pattern_data: PatternData,
    pub confidence_score: f64,
    pub sample_size: u32,
    pub success_rate: f64,
    /// p-value of the binomial test against the null hypothesis.
    pub statistical_significance: f64,
    pub identified_at: DateTime<Utc>,
    pub last_validated: DateTime<Utc>,
    pub is_active: bool,
    /// Industries and client sizes seen in the contributing outcomes.
    #[serde(default)]
    pub client_segments: Vec<String>,
}

impl SuccessPattern {
    pub fn pattern_type(&self) -> PatternType {
        self.pattern_data.pattern_type()
    }

    /// Successes reconstructed from rate and sample size.
    pub fn success_count(&self) -> u32 {
        (self.success_rate * self.sample_size as f64).round() as u32
    }

    /// Tag set used for cache invalidation.
    pub fn tags(&self) -> Vec<String> {
        let mut out = vec![tags::pattern_tag(&self.id), tags::type_tag(self.pattern_type())];
        out.extend(self.client_segments.iter().map(|s| tags::segment_tag(s)));
        out
    }

    /// Build a pattern id from type and payload.
    ///
    /// With `created_at` the timestamp is folded into the hash, so re-running
    /// the same extraction yields a fresh id. Without it the id is purely
    /// content-addressed.
    pub fn generate_id(data: &PatternData, created_at: Option<DateTime<Utc>>) -> PulseResult<String> {
        let pattern_type = data.pattern_type();
        let mut hasher = blake3::Hasher::new();
        hasher.update(pattern_type.name().as_bytes());
        hasher.update(data.canonical_json()?.as_bytes());
        if let Some(ts) = created_at {
            hasher.update(ts.to_rfc3339_opts(SecondsFormat::Nanos, true).as_bytes());
        }
        let hex = hasher.finalize().to_hex();
        Ok(format!("{}_{}", pattern_type.name(), &hex.as_str()[..16]))
    }

    /// Check the model invariants.
    pub fn validate(&self) -> PulseResult<()> {
        let fail = |reason: &str| -> PulseResult<()> {
            Err(DetectionError::InvalidPattern {
                pattern_id: self.id.clone(),
                reason: reason.to_string(),
            }
            .into())
        };
        if !(0.0..=1.0).contains(&self.confidence_score) {
            return fail("confidence_score outside [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.success_rate) {
            return fail("success_rate outside [0, 1]");
        }
        if self.is_active && self.sample_size == 0 {
            return fail("active pattern with zero samples");
        }
        if self.last_validated < self.identified_at {
            return fail("last_validated precedes identified_at");
        }
        Ok(())
    }
}
