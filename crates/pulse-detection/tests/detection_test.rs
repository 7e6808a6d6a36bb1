//! Pattern detection: batch analysis and the incremental path.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use pulse_cache::PatternCacheManager;
use pulse_core::config::{CacheConfig, DetectionConfig};
use pulse_core::events::{AnalysisFailedEvent, EventDispatcher, PatternDiscoveredEvent, PatternEventHandler};
use pulse_core::models::*;
use pulse_core::traits::{InMemoryOutcomeStore, ManualClock};
use pulse_detection::PatternDetectionEngine;

#[derive(Default)]
struct Counter {
    discovered: AtomicUsize,
    failed: AtomicUsize,
}

impl PatternEventHandler for Counter {
    fn on_pattern_discovered(&self, _event: &PatternDiscoveredEvent) {
        self.discovered.fetch_add(1, Ordering::SeqCst);
    }

    fn on_analysis_failed(&self, _event: &AnalysisFailedEvent) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

struct Fixture {
    engine: PatternDetectionEngine,
    store: Arc<InMemoryOutcomeStore>,
    cache: Arc<PatternCacheManager>,
    counter: Arc<Counter>,
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

fn fixture_with(config: DetectionConfig) -> Fixture {
    let clock = Arc::new(ManualClock::new(start()));
    let events = Arc::new(EventDispatcher::new());
    let counter = Arc::new(Counter::default());
    events.register(counter.clone());
    let store = Arc::new(InMemoryOutcomeStore::new());
    let cache = Arc::new(PatternCacheManager::new(
        CacheConfig::default(),
        clock.clone(),
        events.clone(),
    ));
    let engine = PatternDetectionEngine::new(config, store.clone(), clock, events).with_cache(cache.clone());
    Fixture { engine, store, cache, counter }
}

fn fixture() -> Fixture {
    fixture_with(DetectionConfig::default())
}

fn outcome(client: &str, hypothesis: &str, result: Outcome, minute: i64) -> ContentOutcomeData {
    ContentOutcomeData::new(client, result, start() + Duration::minutes(minute)).with_hypothesis(hypothesis)
}

#[test]
fn identical_successes_yield_a_hypothesis_pattern() {
    let f = fixture();
    let outcomes: Vec<ContentOutcomeData> = (0..5)
        .map(|i| outcome("acme", "Add urgency to CTA", Outcome::Success, i))
        .collect();

    let result = f.engine.analyze_outcomes(&outcomes);

    assert_eq!(result.outcomes_analyzed, 5);
    assert_eq!(result.groups_found, 1);
    let pattern = result
        .patterns
        .iter()
        .find(|p| p.pattern_type() == PatternType::Hypothesis)
        .expect("hypothesis pattern");
    assert_eq!(pattern.sample_size, 5);
    assert_eq!(pattern.success_rate, 1.0);
    assert!(pattern.confidence_score > 0.6);
    assert!(pattern.is_active);
    assert!(pattern.validate().is_ok());
    assert!(!result.recommendations.is_empty());
}

#[test]
fn unrelated_outcomes_yield_nothing() {
    let f = fixture();
    let hypotheses = [
        "Add urgency to CTA",
        "Lower the entry price",
        "Show customer logos",
        "Shorten signup form",
        "Offer annual discount",
    ];
    let outcomes: Vec<ContentOutcomeData> = hypotheses
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let result = if i % 2 == 0 { Outcome::Success } else { Outcome::Failure };
            outcome("acme", h, result, i as i64)
        })
        .collect();

    let result = f.engine.analyze_outcomes(&outcomes);

    assert!(result.patterns.is_empty());
    assert_eq!(result.groups_found, 0);
    assert_eq!(result.average_confidence, 0.0);
    assert_eq!(result.recommendations.len(), 1);
}

#[test]
fn shared_hypothesis_beats_unrelated_failures() {
    let f = fixture();
    let outcomes = vec![
        outcome("acme", "Add urgency to CTA", Outcome::Success, 0),
        outcome("acme", "Lower the entry price", Outcome::Failure, 1),
        outcome("acme", "Add urgency to CTA", Outcome::Success, 2),
        outcome("acme", "Show customer logos", Outcome::Failure, 3),
        outcome("acme", "Add urgency to CTA", Outcome::Success, 4),
    ];

    let result = f.engine.analyze_outcomes(&outcomes);

    assert_eq!(result.patterns.len(), 1);
    let pattern = &result.patterns[0];
    assert_eq!(pattern.pattern_type(), PatternType::Hypothesis);
    assert_eq!(pattern.pattern_data.hypothesis(), Some("Add urgency to CTA"));
    assert_eq!(pattern.sample_size, 3);
    assert_eq!(pattern.success_rate, 1.0);
    assert_eq!(result.high_confidence_count, 1);
    assert_eq!(result.average_confidence, pattern.confidence_score);
}

#[test]
fn empty_and_all_failure_inputs_yield_nothing() {
    let f = fixture();
    assert!(f.engine.analyze_outcomes(&[]).patterns.is_empty());

    let failures: Vec<ContentOutcomeData> = (0..6)
        .map(|i| outcome("acme", "Add urgency to CTA", Outcome::Failure, i))
        .collect();
    let result = f.engine.analyze_outcomes(&failures);
    assert!(result.patterns.is_empty());
    assert_eq!(result.outcomes_analyzed, 6);
}

#[test]
fn group_failures_count_against_the_pattern() {
    let f = fixture();
    let mut outcomes: Vec<ContentOutcomeData> = (0..4)
        .map(|i| outcome("acme", "Add urgency to CTA", Outcome::Success, i))
        .collect();
    outcomes.push(outcome("acme", "Add urgency to CTA", Outcome::Failure, 5));

    let result = f.engine.analyze_outcomes(&outcomes);

    assert_eq!(result.patterns.len(), 1);
    let pattern = &result.patterns[0];
    assert_eq!(pattern.sample_size, 5);
    assert!((pattern.success_rate - 0.8).abs() < 1e-12);
    // 0.4·0.8 + 0.4·log10(6)/log10(11) + 0.2·0.6
    assert!((pattern.confidence_score - 0.7389).abs() < 1e-3);
}

#[test]
fn weak_groups_fall_below_the_confidence_floor() {
    let f = fixture();
    let mut outcomes: Vec<ContentOutcomeData> = (0..3)
        .map(|i| outcome("acme", "Add urgency to CTA", Outcome::Success, i))
        .collect();
    outcomes.push(outcome("acme", "Add urgency to CTA", Outcome::Failure, 4));
    outcomes.push(outcome("acme", "Add urgency to CTA", Outcome::Failure, 5));

    let result = f.engine.analyze_outcomes(&outcomes);

    assert_eq!(result.groups_found, 1);
    assert!(result.patterns.is_empty());
}

#[test]
fn shared_content_yields_a_content_pattern() {
    let f = fixture();
    let content = ContentElements {
        headline: Some("Grow faster".into()),
        ctas: vec!["Start free trial".into()],
        ..Default::default()
    };
    let outcomes: Vec<ContentOutcomeData> = (0..4)
        .map(|i| {
            ContentOutcomeData::new("acme", Outcome::Success, start() + Duration::minutes(i))
                .with_content(content.clone())
        })
        .collect();

    let result = f.engine.analyze_outcomes(&outcomes);

    assert_eq!(result.patterns.len(), 1);
    let pattern = &result.patterns[0];
    assert_eq!(pattern.pattern_type(), PatternType::ContentElement);
    let elements = pattern.pattern_data.elements().unwrap();
    assert_eq!(elements.headline.as_deref(), Some("Grow faster"));
    assert_eq!(elements.ctas, vec!["Start free trial".to_string()]);
    assert_eq!(pattern.sample_size, 4);
}

#[test]
fn strong_components_compose_a_mixed_pattern() {
    let f = fixture();
    let outcomes: Vec<ContentOutcomeData> = (0..5)
        .map(|i| {
            outcome("acme", "Add urgency to CTA", Outcome::Success, i)
                .with_timing(TimingFactors {
                    time_to_payment_secs: Some(300.0),
                    page_views: Some(4),
                    ..Default::default()
                })
                .with_context(ContextFactors {
                    industry: Some("SaaS".into()),
                    client_size: None,
                })
        })
        .collect();

    let result = f.engine.analyze_outcomes(&outcomes);

    let mixed = result
        .patterns
        .iter()
        .find(|p| p.pattern_type() == PatternType::Mixed)
        .expect("mixed pattern");
    let strongest_component = result
        .patterns
        .iter()
        .filter(|p| p.pattern_type() != PatternType::Mixed)
        .map(|p| p.confidence_score)
        .fold(0.0, f64::max);
    assert!(mixed.confidence_score > strongest_component);
    assert!(mixed.confidence_score <= 1.0);
    assert_eq!(mixed.client_segments, vec!["saas".to_string()]);
    let timing = mixed.pattern_data.timing().unwrap();
    assert_eq!(timing.avg_time_to_payment_secs, Some(300.0));
    assert_eq!(result.high_confidence_count, result.patterns.len());
}

#[test]
fn confidence_floor_is_configurable() {
    let f = fixture_with(DetectionConfig {
        min_confidence_threshold: 0.95,
        ..Default::default()
    });
    let outcomes: Vec<ContentOutcomeData> = (0..3)
        .map(|i| outcome("acme", "Add urgency to CTA", Outcome::Success, i))
        .collect();
    assert!(f.engine.analyze_outcomes(&outcomes).patterns.is_empty());
}

#[test]
fn invalid_input_reports_failure_and_returns_empty() {
    let f = fixture();
    let bad = outcome("acme", "Add urgency to CTA", Outcome::Success, 0).with_timing(TimingFactors {
        time_to_payment_secs: Some(-1.0),
        ..Default::default()
    });

    let result = f.engine.analyze_outcomes(&[bad]);

    assert!(result.patterns.is_empty());
    assert_eq!(result.outcomes_analyzed, 1);
    assert_eq!(f.counter.failed.load(Ordering::SeqCst), 1);
}

#[test]
fn new_outcome_completes_a_pattern_from_history() {
    let f = fixture();
    f.store
        .record_outcome(outcome("acme", "Add urgency to CTA", Outcome::Success, 0))
        .unwrap();
    f.store
        .record_outcome(outcome("acme", "add urgency to cta", Outcome::Success, 1))
        .unwrap();
    f.store
        .record_outcome(outcome("acme", "Lower the entry price", Outcome::Failure, 2))
        .unwrap();

    let latest = outcome("acme", "Add urgency to CTA", Outcome::Success, 3);
    let patterns = f.engine.process_new_outcome("acme", &latest);

    assert_eq!(patterns.len(), 1);
    let pattern = &patterns[0];
    assert_eq!(pattern.sample_size, 3);
    assert_eq!(pattern.success_rate, 1.0);
    assert_eq!(f.store.pattern_count(), 1);
    assert!(f.store.pattern(&pattern.id).unwrap().is_some());
    assert!(f.cache.get_pattern(&pattern.id).is_some());
    assert_eq!(f.counter.discovered.load(Ordering::SeqCst), 1);
}

#[test]
fn recorded_outcome_is_not_counted_twice() {
    let f = fixture();
    for i in 0..2 {
        f.store
            .record_outcome(outcome("acme", "Add urgency to CTA", Outcome::Success, i))
            .unwrap();
    }
    let latest = outcome("acme", "Add urgency to CTA", Outcome::Success, 2);
    f.store.record_outcome(latest.clone()).unwrap();

    let patterns = f.engine.process_new_outcome("acme", &latest);

    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].sample_size, 3);
}

#[test]
fn too_few_similar_successes_yield_nothing() {
    let f = fixture();
    f.store
        .record_outcome(outcome("acme", "Add urgency to CTA", Outcome::Success, 0))
        .unwrap();
    f.store
        .record_outcome(outcome("other", "Add urgency to CTA", Outcome::Success, 1))
        .unwrap();

    let latest = outcome("acme", "Add urgency to CTA", Outcome::Success, 2);
    assert!(f.engine.process_new_outcome("acme", &latest).is_empty());
    assert_eq!(f.store.pattern_count(), 0);
    assert_eq!(f.counter.discovered.load(Ordering::SeqCst), 0);
}

#[test]
fn invalid_new_outcome_is_swallowed() {
    let f = fixture();
    let bad = ContentOutcomeData::new("  ", Outcome::Success, start());
    assert!(f.engine.process_new_outcome("acme", &bad).is_empty());
    assert_eq!(f.counter.failed.load(Ordering::SeqCst), 1);
}
