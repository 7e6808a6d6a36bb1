use chrono::{Duration, Utc};
use pulse_core::errors::{PulseError, PulseErrorCode};
use pulse_core::models::*;
use pulse_core::tags;

fn hypothesis_pattern(id: &str) -> SuccessPattern {
    let now = Utc::now();
    SuccessPattern {
        id: id.to_string(),
        pattern_data: PatternData::Hypothesis {
            hypothesis: "Add urgency to CTA".to_string(),
        },
        confidence_score: 0.8,
        sample_size: 10,
        success_rate: 0.7,
        statistical_significance: 0.04,
        identified_at: now,
        last_validated: now,
        is_active: true,
        client_segments: vec!["SaaS".to_string()],
    }
}

#[test]
fn pattern_type_follows_payload() {
    let p = hypothesis_pattern("p1");
    assert_eq!(p.pattern_type(), PatternType::Hypothesis);
    assert_eq!(p.pattern_data.hypothesis(), Some("Add urgency to CTA"));
    assert!(p.pattern_data.elements().is_none());
    assert_eq!("content-element".parse::<PatternType>().unwrap(), PatternType::ContentElement);
    assert!("bogus".parse::<PatternType>().is_err());
}

#[test]
fn success_count_is_reconstructed_from_rate() {
    assert_eq!(hypothesis_pattern("p").success_count(), 7);
}

#[test]
fn tags_cover_id_type_and_segments() {
    let tags_list = hypothesis_pattern("p1").tags();
    assert!(tags_list.contains(&tags::pattern_tag("p1")));
    assert!(tags_list.contains(&"type:hypothesis".to_string()));
    assert!(tags_list.contains(&"segment:saas".to_string()));
}

#[test]
fn timestamped_ids_differ_and_content_ids_repeat() {
    let data = PatternData::Hypothesis { hypothesis: "x".into() };
    let t0 = Utc::now();
    let a = SuccessPattern::generate_id(&data, Some(t0)).unwrap();
    let b = SuccessPattern::generate_id(&data, Some(t0 + Duration::nanoseconds(1))).unwrap();
    assert_ne!(a, b);
    assert!(a.starts_with("hypothesis_"));

    let c = SuccessPattern::generate_id(&data, None).unwrap();
    let d = SuccessPattern::generate_id(&data, None).unwrap();
    assert_eq!(c, d);
}

#[test]
fn validate_rejects_broken_invariants() {
    let mut p = hypothesis_pattern("p");
    assert!(p.validate().is_ok());

    p.confidence_score = 1.2;
    assert!(p.validate().is_err());

    let mut p = hypothesis_pattern("p");
    p.sample_size = 0;
    assert!(p.validate().is_err());
    p.is_active = false;
    assert!(p.validate().is_ok());

    let mut p = hypothesis_pattern("p");
    p.last_validated = p.identified_at - Duration::seconds(1);
    let err = p.validate().unwrap_err();
    assert_eq!(err.error_code(), "DETECTION_ERROR");
}

#[test]
fn content_elements_flatten_and_rebuild() {
    let content = ContentElements {
        headline: Some("Grow".into()),
        pricing: Some("$99".into()),
        benefits: vec!["Fast".into()],
        features: vec![],
        ctas: vec!["Buy".into(), "Try".into()],
    };
    let flat = content.elements();
    assert_eq!(flat.len(), 5);
    assert_eq!(ContentElements::from_elements(flat), content);
    assert!(ContentElements::default().is_empty());
}

#[test]
fn outcome_validation_rejects_negative_timing() {
    let outcome = ContentOutcomeData::new("c1", Outcome::Success, Utc::now()).with_timing(
        TimingFactors {
            time_to_payment_secs: Some(-3.0),
            ..Default::default()
        },
    );
    let err = outcome.validate().unwrap_err();
    assert!(matches!(err, PulseError::Detection(_)));

    let blank = ContentOutcomeData::new("  ", Outcome::Failure, Utc::now());
    assert!(blank.validate().is_err());
}

#[test]
fn blank_hypothesis_is_treated_as_absent() {
    let outcome = ContentOutcomeData::new("c1", Outcome::Success, Utc::now()).with_hypothesis("   ");
    assert_eq!(outcome.hypothesis_text(), None);
}

#[test]
fn pattern_update_collects_all_tags() {
    let update = PatternUpdateResult {
        updated_patterns: vec![hypothesis_pattern("a")],
        new_patterns: vec![hypothesis_pattern("b")],
        affected_clients: vec!["c9".into()],
        affected_tags: vec!["custom".into()],
        ..Default::default()
    };
    let all = update.all_tags();
    assert!(all.contains("pattern:a"));
    assert!(all.contains("pattern:b"));
    assert!(all.contains("client:c9"));
    assert!(all.contains("custom"));
    assert!(!update.is_empty());
}

#[test]
fn recommendation_priority_orders_low_to_critical() {
    assert!(RecommendationPriority::Critical > RecommendationPriority::High);
    assert!(RecommendationPriority::Medium > RecommendationPriority::Low);
}

#[test]
fn pattern_serializes_with_tagged_payload() {
    let json = serde_json::to_value(hypothesis_pattern("p")).unwrap();
    assert_eq!(json["pattern_data"]["type"], "hypothesis");
}
