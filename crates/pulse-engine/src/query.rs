//! Pattern queries served through the cache's query segment.

use pulse_core::errors::PulseResult;
use pulse_core::models::{PatternType, SuccessPattern};
use pulse_core::tags;
use serde::{Deserialize, Serialize};

use crate::runtime::PulseRuntime;

const PATTERN_QUERY: &str = "active_patterns";

/// Filter over the active patterns. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternQuery {
    pub pattern_type: Option<PatternType>,
    pub min_confidence: Option<f64>,
    /// Industry or client size the pattern must have been seen in.
    pub segment: Option<String>,
    pub limit: Option<usize>,
}

impl PatternQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of_type(mut self, pattern_type: PatternType) -> Self {
        self.pattern_type = Some(pattern_type);
        self
    }

    pub fn min_confidence(mut self, min: f64) -> Self {
        self.min_confidence = Some(min);
        self
    }

    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, pattern: &SuccessPattern) -> bool {
        pattern.is_active
            && self.pattern_type.map_or(true, |t| pattern.pattern_type() == t)
            && self.min_confidence.map_or(true, |m| pattern.confidence_score >= m)
            && self.segment.as_deref().map_or(true, |s| {
                let s = s.trim().to_lowercase();
                pattern.client_segments.iter().any(|seg| *seg == s)
            })
    }

    /// Matching patterns, best confidence first, ties by id.
    pub fn apply(&self, patterns: Vec<SuccessPattern>) -> Vec<SuccessPattern> {
        let mut out: Vec<SuccessPattern> = patterns.into_iter().filter(|p| self.matches(p)).collect();
        out.sort_by(|a, b| {
            b.confidence_score
                .total_cmp(&a.confidence_score)
                .then_with(|| a.id.cmp(&b.id))
        });
        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }

    /// Tags for a cached result: every returned pattern, plus the type tags
    /// a new pattern would need to carry to change the answer.
    pub fn result_tags(&self, results: &[SuccessPattern]) -> Vec<String> {
        let mut out: Vec<String> = match self.pattern_type {
            Some(t) => vec![tags::type_tag(t)],
            None => PatternType::ALL.into_iter().map(tags::type_tag).collect(),
        };
        out.extend(results.iter().map(|p| tags::pattern_tag(&p.id)));
        out
    }
}

impl PulseRuntime {
    /// Active patterns matching `query`, served from the query cache when possible.
    pub fn query_patterns(&self, query: &PatternQuery) -> PulseResult<Vec<SuccessPattern>> {
        let _span = pulse_observability::cache_span!(PATTERN_QUERY).entered();
        let params = serde_json::to_value(query)?;
        if let Some(cached) = self.cache.get_query_result(PATTERN_QUERY, &params) {
            match serde_json::from_value(cached) {
                Ok(patterns) => return Ok(patterns),
                Err(e) => tracing::warn!(error = %e, "discarding unreadable cached query result"),
            }
        }

        let patterns = query.apply(self.store.active_patterns()?);
        let tags = query.result_tags(&patterns);
        if let Err(e) = self
            .cache
            .cache_query_result(PATTERN_QUERY, &params, serde_json::to_value(&patterns)?, tags)
        {
            tracing::warn!(error = %e, "failed to cache query result");
        }
        Ok(patterns)
    }
}
