//! Real-time recommendation engine behaviour.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{Duration, Utc};
use pulse_cache::PatternCacheManager;
use pulse_core::config::{CacheConfig, RecommendationConfig};
use pulse_core::events::{EventDispatcher, PatternEventHandler, PatternsUpdatedEvent, RecommendationsGeneratedEvent};
use pulse_core::models::*;
use pulse_core::traits::{Clock, ManualClock};
use pulse_recommend::RealtimeRecommendationEngine;

struct Fixture {
    engine: Arc<RealtimeRecommendationEngine>,
    cache: Arc<PatternCacheManager>,
    clock: Arc<ManualClock>,
    events: Arc<EventDispatcher>,
}

fn fixture() -> Fixture {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let events = Arc::new(EventDispatcher::new());
    let cache = Arc::new(PatternCacheManager::new(
        CacheConfig::default(),
        clock.clone(),
        events.clone(),
    ));
    let engine = Arc::new(
        RealtimeRecommendationEngine::new(RecommendationConfig::default(), clock.clone(), events.clone())
            .with_cache(cache.clone()),
    );
    Fixture { engine, cache, clock, events }
}

fn journey(f: &Fixture, client: &str, page: &str) -> ActiveClientJourney {
    ActiveClientJourney::new(client, format!("session-{client}"), page, f.clock.now())
}

fn hypothesis_pattern(id: &str, confidence: f64, rate: f64, segments: &[&str]) -> SuccessPattern {
    let at = Utc::now() - Duration::days(1);
    SuccessPattern {
        id: id.to_string(),
        pattern_data: PatternData::Hypothesis {
            hypothesis: format!("Hypothesis {id}"),
        },
        confidence_score: confidence,
        sample_size: 12,
        success_rate: rate,
        statistical_significance: 0.01,
        identified_at: at,
        last_validated: at,
        is_active: true,
        client_segments: segments.iter().map(|s| s.to_string()).collect(),
    }
}

fn timing_pattern(id: &str) -> SuccessPattern {
    SuccessPattern {
        pattern_data: PatternData::Timing {
            profile: TimingProfile {
                avg_time_to_payment_secs: Some(1800.0),
                avg_engagement_duration_secs: Some(600.0),
                sample_count: 6,
                ..Default::default()
            },
        },
        statistical_significance: 0.2,
        ..hypothesis_pattern(id, 0.8, 0.9, &[])
    }
}

// ── T-01: interventions ──

#[test]
fn quiet_journey_without_patterns_gets_nothing() {
    let f = fixture();
    assert!(f.engine.update_client_journey(journey(&f, "c1", "/home")).is_empty());
}

#[test]
fn drop_off_risk_raises_critical_intervention_and_alert() {
    let f = fixture();
    let mut j = journey(&f, "c1", "/checkout");
    j.drop_off_risk = 0.9;
    let recs = f.engine.update_client_journey(j);

    let first = &recs[0];
    assert_eq!(first.recommendation_type, RecommendationType::Intervention);
    assert_eq!(first.priority, RecommendationPriority::Critical);
    assert_eq!(first.urgency, Urgency::Immediate);
    assert_eq!(first.expires_at - first.generated_at, Duration::seconds(300));
    assert!(matches!(first.directive, ImplementationDirective::ShowPopup { .. }));

    let alerts = f.cache.get_alerts("c1").expect("critical alert cached");
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, AlertSeverity::Critical);
    assert_eq!(f.cache.get_recommendations("c1").map(|r| r.len()), Some(recs.len()));
}

#[test]
fn repeated_drop_off_keeps_one_alert_per_trigger() {
    let f = fixture();
    for _ in 0..200 {
        let mut j = journey(&f, "c1", "/checkout");
        j.drop_off_risk = 0.9;
        f.engine.update_client_journey(j);
        f.clock.advance(Duration::seconds(30));
    }

    let alerts = f.cache.get_alerts("c1").expect("alert cached");
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].title, "Drop-off risk on /checkout");
    assert_eq!(alerts[0].created_at, f.clock.now() - Duration::seconds(30));
}

#[test]
fn alerts_older_than_ttl_are_dropped_on_refresh() {
    let f = fixture();
    for page in ["/checkout", "/proposal", "/pricing"] {
        let mut j = journey(&f, "c1", page);
        j.drop_off_risk = 0.9;
        f.engine.update_client_journey(j);
        f.clock.advance(Duration::minutes(4));
    }

    let titles: Vec<String> = f
        .cache
        .get_alerts("c1")
        .expect("alerts cached")
        .into_iter()
        .map(|a| a.title)
        .collect();
    assert_eq!(titles, vec!["Drop-off risk on /proposal", "Drop-off risk on /pricing"]);
}

#[test]
fn hesitation_needs_same_page_two_minutes_apart() {
    let f = fixture();
    f.engine.update_client_journey(journey(&f, "c1", "/pricing"));

    f.clock.advance(Duration::seconds(60));
    let recs = f.engine.update_client_journey(journey(&f, "c1", "/pricing"));
    assert!(recs.iter().all(|r| !r.title.starts_with("Hesitation")));

    f.clock.advance(Duration::seconds(180));
    let recs = f.engine.update_client_journey(journey(&f, "c1", "/pricing"));
    assert!(recs.iter().any(|r| r.title == "Hesitation on /pricing"));

    f.clock.advance(Duration::seconds(180));
    let recs = f.engine.update_client_journey(journey(&f, "c1", "/checkout"));
    assert!(recs.iter().all(|r| !r.title.starts_with("Hesitation")));
}

// ── T-02: pattern-driven recommendations ──

#[test]
fn strong_pattern_yields_swap_and_ab_test() {
    let f = fixture();
    f.engine.update_pattern_cache(&[hypothesis_pattern("p1", 0.9, 0.9, &[])]);
    let recs = f.engine.update_client_journey(journey(&f, "c1", "/offer"));

    let kinds: Vec<RecommendationType> = recs.iter().map(|r| r.recommendation_type).collect();
    assert_eq!(kinds, vec![RecommendationType::ContentSwap, RecommendationType::AbTest]);
    let swap = &recs[0];
    assert_eq!(swap.based_on_patterns, vec!["p1".to_string()]);
    assert!((swap.expected_impact - 0.36).abs() < 1e-9);
    assert_eq!(swap.expires_at - swap.generated_at, Duration::seconds(1800));
}

#[test]
fn timing_pattern_yields_timing_adjustment() {
    let f = fixture();
    f.engine.update_pattern_cache(&[timing_pattern("t1")]);
    let recs = f.engine.update_client_journey(journey(&f, "c1", "/offer"));
    assert_eq!(recs.len(), 1);
    match &recs[0].directive {
        ImplementationDirective::AdjustTiming { follow_up_after_secs, target_engagement_secs } => {
            assert_eq!(*follow_up_after_secs, 1800.0);
            assert_eq!(*target_engagement_secs, Some(600.0));
        }
        other => panic!("unexpected directive {other:?}"),
    }
}

#[test]
fn low_impact_and_low_confidence_patterns_are_skipped() {
    let f = fixture();
    f.engine.update_pattern_cache(&[
        hypothesis_pattern("flat", 0.9, 0.5, &[]),
        hypothesis_pattern("weak", 0.5, 0.9, &[]),
    ]);
    assert!(f.engine.update_client_journey(journey(&f, "c1", "/offer")).is_empty());
}

#[test]
fn results_are_capped_and_ordered() {
    let f = fixture();
    let patterns: Vec<SuccessPattern> = (0..8)
        .map(|i| hypothesis_pattern(&format!("p{i}"), 0.82 + i as f64 * 0.01, 0.95, &[]))
        .collect();
    f.engine.update_pattern_cache(&patterns);
    let mut j = journey(&f, "c1", "/pricing");
    j.drop_off_risk = 0.8;
    let recs = f.engine.update_client_journey(j);

    assert_eq!(recs.len(), 5);
    assert_eq!(recs[0].recommendation_type, RecommendationType::Intervention);
    for pair in recs.windows(2) {
        assert!(pair[0].priority >= pair[1].priority);
        if pair[0].priority == pair[1].priority {
            assert!(pair[0].expected_impact >= pair[1].expected_impact);
        }
    }
}

#[test]
fn segment_patterns_personalize_matching_journeys() {
    let f = fixture();
    f.engine.update_pattern_cache(&[hypothesis_pattern("saas", 0.75, 0.9, &["SaaS"])]);

    let mut j = journey(&f, "c1", "/offer");
    j.industry = Some("saas".to_string());
    let recs = f.engine.update_client_journey(j);
    assert!(recs.iter().any(|r| r.recommendation_type == RecommendationType::Personalization));

    let mut other = journey(&f, "c2", "/offer");
    other.industry = Some("retail".to_string());
    assert!(f.engine.update_client_journey(other).is_empty());
}

// ── T-03: pattern updates ──

#[test]
fn pattern_update_re_evaluates_relevant_journeys() {
    let f = fixture();
    let mut saas = journey(&f, "c1", "/offer");
    saas.industry = Some("SaaS".to_string());
    let mut retail = journey(&f, "c2", "/offer");
    retail.industry = Some("Retail".to_string());
    f.engine.update_client_journey(saas);
    f.engine.update_client_journey(retail);

    let update = PatternUpdateResult {
        new_patterns: vec![hypothesis_pattern("p1", 0.9, 0.9, &["saas"])],
        ..Default::default()
    };
    assert_eq!(f.engine.process_pattern_update(&update), 1);
    assert!(!f.engine.active_recommendations("c1").is_empty());
    assert!(f.engine.active_recommendations("c2").is_empty());
    assert_eq!(f.engine.tracked_patterns(), 1);
}

#[test]
fn deactivated_patterns_leave_the_local_cache() {
    let f = fixture();
    let mut p = hypothesis_pattern("p1", 0.9, 0.9, &[]);
    f.engine.update_pattern_cache(&[p.clone()]);
    p.is_active = false;
    f.engine.update_pattern_cache(&[p]);
    assert_eq!(f.engine.tracked_patterns(), 0);
}

#[derive(Default)]
struct Generated(AtomicUsize);

impl PatternEventHandler for Generated {
    fn on_recommendations_generated(&self, _event: &RecommendationsGeneratedEvent) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn attached_engine_refreshes_on_pattern_events() {
    let f = fixture();
    f.engine.attach();
    let generated = Arc::new(Generated::default());
    f.events.register(generated.clone());

    f.engine.update_client_journey(journey(&f, "c1", "/offer"));
    f.events.emit_patterns_updated(&PatternsUpdatedEvent {
        update: PatternUpdateResult {
            new_patterns: vec![hypothesis_pattern("p1", 0.9, 0.9, &[])],
            ..Default::default()
        },
    });

    assert_eq!(generated.0.load(Ordering::SeqCst), 2);
    assert!(!f.engine.active_recommendations("c1").is_empty());

    f.engine.detach();
    assert_eq!(f.events.handler_count(), 1);
}

// ── T-04: session lifecycle ──

#[test]
fn expired_recommendations_are_not_active() {
    let f = fixture();
    let mut j = journey(&f, "c1", "/checkout");
    j.drop_off_risk = 0.9;
    f.engine.update_client_journey(j);
    assert_eq!(f.engine.active_recommendations("c1").len(), 1);

    f.clock.advance(Duration::seconds(301));
    assert!(f.engine.active_recommendations("c1").is_empty());
}

#[test]
fn idle_journeys_are_pruned() {
    let f = fixture();
    f.engine.update_client_journey(journey(&f, "old", "/home"));
    f.clock.advance(Duration::minutes(31));
    f.engine.update_client_journey(journey(&f, "fresh", "/home"));

    assert_eq!(f.engine.prune_idle_journeys(), 1);
    assert!(f.engine.journey("old").is_none());
    assert!(f.engine.journey("fresh").is_some());
}

#[test]
fn end_session_forgets_client() {
    let f = fixture();
    f.engine.update_client_journey(journey(&f, "c1", "/home"));
    assert_eq!(f.engine.active_journeys(), 1);
    assert!(f.engine.end_session("c1"));
    assert!(!f.engine.end_session("c1"));
    assert_eq!(f.engine.active_journeys(), 0);
}
