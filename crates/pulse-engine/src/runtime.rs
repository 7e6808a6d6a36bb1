//! PulseRuntime: owns every component and the background tasks.

use std::sync::{Arc, Mutex, PoisonError};

use pulse_cache::PatternCacheManager;
use pulse_core::config::PulseConfig;
use pulse_core::errors::{PulseError, PulseResult};
use pulse_core::events::EventDispatcher;
use pulse_core::models::{ActiveClientJourney, ContentOutcomeData, PatternDetectionResult, RealTimeRecommendation};
use pulse_core::traits::{Clock, OutcomeStore};
use pulse_detection::PatternDetectionEngine;
use pulse_dynamic::DynamicConfidenceUpdater;
use pulse_observability::{analysis_span, recommend_span, HealthSnapshot};
use pulse_recommend::RealtimeRecommendationEngine;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

pub struct PulseRuntime {
    pub(crate) config: PulseConfig,
    pub(crate) store: Arc<dyn OutcomeStore>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) events: Arc<EventDispatcher>,
    pub(crate) cache: Arc<PatternCacheManager>,
    pub(crate) detection: PatternDetectionEngine,
    pub(crate) dynamic: DynamicConfidenceUpdater,
    pub(crate) recommendations: Arc<RealtimeRecommendationEngine>,
    journey_sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl PulseRuntime {
    /// Validate `config`, build every component around one dispatcher, and
    /// subscribe the cache and the recommendation engine to pattern updates.
    pub fn new(
        config: PulseConfig,
        store: Arc<dyn OutcomeStore>,
        clock: Arc<dyn Clock>,
    ) -> PulseResult<Arc<Self>> {
        config.validate()?;
        let events = Arc::new(EventDispatcher::new());

        let cache = Arc::new(PatternCacheManager::new(
            config.cache.clone(),
            Arc::clone(&clock),
            Arc::clone(&events),
        ));
        let detection = PatternDetectionEngine::new(
            config.detection.clone(),
            Arc::clone(&store),
            Arc::clone(&clock),
            Arc::clone(&events),
        );
        let dynamic = DynamicConfidenceUpdater::new(config.dynamic.clone(), Arc::clone(&clock), Arc::clone(&events))
            .with_null_hypothesis(config.detection.null_hypothesis);
        let recommendations = Arc::new(
            RealtimeRecommendationEngine::new(
                config.recommendation.clone(),
                Arc::clone(&clock),
                Arc::clone(&events),
            )
            .with_cache(Arc::clone(&cache)),
        );

        // Cache first: invalidation must run before recommendations are re-cached.
        cache.attach();
        recommendations.attach();

        let active = store.active_patterns()?;
        recommendations.update_pattern_cache(&active);
        tracing::info!(
            active_patterns = active.len(),
            handlers = events.handler_count(),
            "pulse runtime ready"
        );

        Ok(Arc::new(Self {
            config,
            store,
            clock,
            events,
            cache,
            detection,
            dynamic,
            recommendations,
            journey_sweeper: Mutex::new(None),
        }))
    }

    pub fn config(&self) -> &PulseConfig {
        &self.config
    }

    pub fn events(&self) -> &Arc<EventDispatcher> {
        &self.events
    }

    pub fn cache(&self) -> &Arc<PatternCacheManager> {
        &self.cache
    }

    pub fn detection(&self) -> &PatternDetectionEngine {
        &self.detection
    }

    pub fn dynamic(&self) -> &DynamicConfidenceUpdater {
        &self.dynamic
    }

    pub fn recommendations(&self) -> &Arc<RealtimeRecommendationEngine> {
        &self.recommendations
    }

    pub fn store(&self) -> &Arc<dyn OutcomeStore> {
        &self.store
    }

    /// Batch analysis. Results are returned, not persisted.
    pub fn analyze_outcomes(&self, outcomes: &[ContentOutcomeData]) -> PatternDetectionResult {
        let _span = analysis_span!(outcomes.len()).entered();
        self.detection.analyze_outcomes(outcomes)
    }

    pub fn update_client_journey(&self, journey: ActiveClientJourney) -> Vec<RealTimeRecommendation> {
        let _span = recommend_span!(journey.client_id).entered();
        self.recommendations.update_client_journey(journey)
    }

    pub fn health(&self) -> HealthSnapshot {
        let stats = self.cache.stats();
        let active_patterns = match self.store.active_patterns() {
            Ok(patterns) => patterns.len(),
            Err(e) => {
                tracing::warn!(error = %e, "health check could not read active patterns");
                0
            }
        };
        HealthSnapshot {
            version: pulse_core::constants::VERSION.to_string(),
            cache_hits: stats.hits,
            cache_misses: stats.misses,
            cache_hit_rate: stats.hit_rate,
            cache_entries: stats.total_entries,
            cache_evictions: stats.evictions,
            pending_invalidations: stats.pending_invalidations,
            maintenance_running: self.cache.maintenance_running(),
            cache_disposed: self.cache.is_disposed(),
            active_patterns,
            tracked_patterns: self.dynamic.tracked_patterns(),
            active_journeys: self.recommendations.active_journeys(),
            event_handlers: self.events.handler_count(),
            taken_at: Some(self.clock.now()),
        }
    }

    /// Start cache maintenance and the idle-journey sweep on the current
    /// tokio runtime. Calling it again restarts both.
    pub fn start_background_tasks(self: &Arc<Self>) -> PulseResult<()> {
        self.cache.spawn_maintenance()?;

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| PulseError::Runtime(e.to_string()))?;
        let weak = Arc::downgrade(self);
        let every = self.config.cache.cleanup_interval();
        let task = runtime.spawn(async move {
            let mut ticker = time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(runtime) = weak.upgrade() else { break };
                runtime.recommendations.prune_idle_journeys();
            }
            tracing::debug!("journey sweep stopped");
        });
        if let Some(previous) = self
            .journey_sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(task)
        {
            previous.abort();
        }
        tracing::debug!("background tasks started");
        Ok(())
    }

    pub fn background_tasks_running(&self) -> bool {
        let sweeping = self
            .journey_sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished());
        sweeping && self.cache.maintenance_running()
    }

    /// Stop background work, drop cached and in-memory state, and detach
    /// every event handler.
    pub fn dispose(&self) {
        if let Some(task) = self
            .journey_sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
        self.recommendations.dispose();
        self.cache.dispose();
        self.dynamic.clear();
        self.events.clear();
        tracing::info!("pulse runtime disposed");
    }
}

impl Drop for PulseRuntime {
    fn drop(&mut self) {
        if let Some(task) = self
            .journey_sweeper
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
    }
}
