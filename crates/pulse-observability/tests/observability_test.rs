use pulse_core::config::ObservabilityConfig;
use pulse_observability::{init_tracing, HealthSnapshot, HealthStatus};

#[test]
fn init_tracing_is_idempotent() {
    let config = ObservabilityConfig::default();
    init_tracing(&config);
    init_tracing(&config);
    let _span = pulse_observability::analysis_span!(3).entered();
    tracing::info!("still logging");
}

#[test]
fn span_macros_expand() {
    let client = "acme";
    let _a = pulse_observability::update_span!(client).entered();
    let _b = pulse_observability::cache_span!("invalidate").entered();
    let _c = pulse_observability::recommend_span!(client).entered();
}

#[test]
fn fresh_snapshot_is_healthy() {
    let snapshot = HealthSnapshot::default();
    assert!(snapshot.issues().is_empty());
    assert!(snapshot.is_healthy());
}

#[test]
fn cold_cache_is_not_flagged() {
    let snapshot = HealthSnapshot {
        cache_hits: 1,
        cache_misses: 9,
        cache_hit_rate: 0.1,
        ..Default::default()
    };
    assert!(snapshot.is_healthy());
}

#[test]
fn low_hit_rate_degrades() {
    let snapshot = HealthSnapshot {
        cache_hits: 10,
        cache_misses: 190,
        cache_hit_rate: 0.05,
        ..Default::default()
    };
    assert_eq!(snapshot.status(), HealthStatus::Degraded);
    assert_eq!(snapshot.issues()[0].subsystem, "cache");
}

#[test]
fn disposed_cache_is_unhealthy() {
    let snapshot = HealthSnapshot {
        cache_disposed: true,
        pending_invalidations: 5_000,
        ..Default::default()
    };
    assert_eq!(snapshot.issues().len(), 2);
    assert_eq!(snapshot.status(), HealthStatus::Unhealthy);
}

#[test]
fn snapshot_serializes_status_in_lowercase() {
    let json = serde_json::to_string(&HealthStatus::Degraded).unwrap();
    assert_eq!(json, "\"degraded\"");
}
