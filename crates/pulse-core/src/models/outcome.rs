use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DetectionError, PulseResult};

/// Result of a single client journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which slot of the page content an element came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentElementKind {
    Headline,
    Pricing,
    Benefit,
    Feature,
    Cta,
}

/// One flattened content element: its slot plus its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentElement {
    pub kind: ContentElementKind,
    pub value: String,
}

impl ContentElement {
    /// Matching key: slot plus trimmed, lowercased text.
    pub fn key(&self) -> (ContentElementKind, String) {
        (self.kind, normalize(&self.value))
    }
}

/// Content shown to a client during a journey.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentElements {
    pub headline: Option<String>,
    pub pricing: Option<String>,
    pub benefits: Vec<String>,
    pub features: Vec<String>,
    pub ctas: Vec<String>,
}

impl ContentElements {
    pub fn is_empty(&self) -> bool {
        self.headline.is_none()
            && self.pricing.is_none()
            && self.benefits.is_empty()
            && self.features.is_empty()
            && self.ctas.is_empty()
    }

    /// Flatten into individual elements, in slot order.
    pub fn elements(&self) -> Vec<ContentElement> {
        let mut out = Vec::new();
        if let Some(h) = &self.headline {
            out.push(ContentElement { kind: ContentElementKind::Headline, value: h.clone() });
        }
        if let Some(p) = &self.pricing {
            out.push(ContentElement { kind: ContentElementKind::Pricing, value: p.clone() });
        }
        let lists = [
            (ContentElementKind::Benefit, &self.benefits),
            (ContentElementKind::Feature, &self.features),
            (ContentElementKind::Cta, &self.ctas),
        ];
        for (kind, values) in lists {
            out.extend(values.iter().map(|v| ContentElement { kind, value: v.clone() }));
        }
        out
    }

    /// Rebuild from flattened elements. A later headline/pricing replaces an earlier one.
    pub fn from_elements<I: IntoIterator<Item = ContentElement>>(elements: I) -> Self {
        let mut content = Self::default();
        for element in elements {
            match element.kind {
                ContentElementKind::Headline => content.headline = Some(element.value),
                ContentElementKind::Pricing => content.pricing = Some(element.value),
                ContentElementKind::Benefit => content.benefits.push(element.value),
                ContentElementKind::Feature => content.features.push(element.value),
                ContentElementKind::Cta => content.ctas.push(element.value),
            }
        }
        content
    }
}

/// Timing measurements attached to an outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingFactors {
    pub time_to_payment_secs: Option<f64>,
    pub engagement_duration_secs: Option<f64>,
    pub page_views: Option<u32>,
    pub interaction_count: Option<u32>,
}

impl TimingFactors {
    pub fn has_any(&self) -> bool {
        self.time_to_payment_secs.is_some()
            || self.engagement_duration_secs.is_some()
            || self.page_views.is_some()
            || self.interaction_count.is_some()
    }
}

/// Client context used to scope similarity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextFactors {
    pub industry: Option<String>,
    pub client_size: Option<String>,
}

/// One observed client journey outcome. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentOutcomeData {
    pub client_id: String,
    pub content_version_id: Option<String>,
    pub outcome: Outcome,
    pub hypothesis: Option<String>,
    pub content_elements: Option<ContentElements>,
    pub timing_factors: Option<TimingFactors>,
    pub context_factors: Option<ContextFactors>,
    pub recorded_at: DateTime<Utc>,
}

impl ContentOutcomeData {
    /// Minimal record: client, outcome and timestamp, everything else absent.
    pub fn new(client_id: impl Into<String>, outcome: Outcome, recorded_at: DateTime<Utc>) -> Self {
        Self {
            client_id: client_id.into(),
            content_version_id: None,
            outcome,
            hypothesis: None,
            content_elements: None,
            timing_factors: None,
            context_factors: None,
            recorded_at,
        }
    }

    pub fn with_hypothesis(mut self, hypothesis: impl Into<String>) -> Self {
        self.hypothesis = Some(hypothesis.into());
        self
    }

    pub fn with_content(mut self, elements: ContentElements) -> Self {
        self.content_elements = Some(elements);
        self
    }

    pub fn with_timing(mut self, timing: TimingFactors) -> Self {
        self.timing_factors = Some(timing);
        self
    }

    pub fn with_context(mut self, context: ContextFactors) -> Self {
        self.context_factors = Some(context);
        self
    }

    /// Hypothesis text, if present and non-blank.
    pub fn hypothesis_text(&self) -> Option<&str> {
        self.hypothesis.as_deref().map(str::trim).filter(|h| !h.is_empty())
    }

    /// Reject records the statistics cannot digest.
    pub fn validate(&self) -> PulseResult<()> {
        if self.client_id.trim().is_empty() {
            return Err(self.invalid("empty client id"));
        }
        if let Some(timing) = &self.timing_factors {
            for (name, value) in [
                ("time_to_payment_secs", timing.time_to_payment_secs),
                ("engagement_duration_secs", timing.engagement_duration_secs),
            ] {
                if let Some(v) = value {
                    if !v.is_finite() || v < 0.0 {
                        return Err(self.invalid(&format!("{name} = {v} must be finite and >= 0")));
                    }
                }
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> crate::errors::PulseError {
        DetectionError::InvalidOutcome {
            client_id: self.client_id.clone(),
            reason: reason.to_string(),
        }
        .into()
    }
}

/// A single new observation fed to the dynamic updater.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeDataPoint {
    pub client_id: String,
    pub outcome: Outcome,
    pub recorded_at: DateTime<Utc>,
    /// Client importance in [0, 1]; scales the final ±5% nudge.
    pub client_importance: Option<f64>,
}

impl From<&ContentOutcomeData> for OutcomeDataPoint {
    fn from(data: &ContentOutcomeData) -> Self {
        Self {
            client_id: data.client_id.clone(),
            outcome: data.outcome,
            recorded_at: data.recorded_at,
            client_importance: None,
        }
    }
}

pub(crate) fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
