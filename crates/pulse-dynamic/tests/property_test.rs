use std::sync::Arc;

use chrono::Utc;
use proptest::prelude::*;
use pulse_core::config::DynamicConfig;
use pulse_core::events::EventDispatcher;
use pulse_core::models::*;
use pulse_core::traits::SystemClock;
use pulse_dynamic::DynamicConfidenceUpdater;

proptest! {
    #[test]
    fn updated_pattern_stays_valid(
        n in 1u32..200,
        rate_steps in 0u32..=100,
        confidence in 0.0f64..=1.0,
        success in any::<bool>(),
        importance in proptest::option::of(0.0f64..=1.0),
    ) {
        let updater = DynamicConfidenceUpdater::new(
            DynamicConfig::default(),
            Arc::new(SystemClock),
            Arc::new(EventDispatcher::new()),
        );
        let now = Utc::now();
        let mut pattern = SuccessPattern {
            id: "p".into(),
            pattern_data: PatternData::Hypothesis { hypothesis: "h".into() },
            confidence_score: confidence,
            sample_size: n,
            success_rate: rate_steps as f64 / 100.0,
            statistical_significance: 0.5,
            identified_at: now,
            last_validated: now,
            is_active: true,
            client_segments: Vec::new(),
        };
        let data = OutcomeDataPoint {
            client_id: "c".into(),
            outcome: if success { Outcome::Success } else { Outcome::Failure },
            recorded_at: now,
            client_importance: importance,
        };
        let result = updater.update_pattern_confidence(&mut pattern, &data).unwrap();
        prop_assert!((0.0..=1.0).contains(&result.new_confidence));
        prop_assert_eq!(pattern.sample_size, n + 1);
        prop_assert!(pattern.validate().is_ok());
    }
}
