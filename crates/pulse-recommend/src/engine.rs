//! RealtimeRecommendationEngine: per-session recommendation state.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use pulse_cache::PatternCacheManager;
use pulse_core::config::RecommendationConfig;
use pulse_core::events::{EventDispatcher, HandlerId, RecommendationsGeneratedEvent};
use pulse_core::models::{
    ActiveClientJourney, AlertSeverity, PatternAlert, PatternUpdateResult, RealTimeRecommendation,
    RecommendationPriority, RecommendationType, SuccessPattern,
};
use pulse_core::traits::Clock;

use crate::draft::Draft;
use crate::handler::RecommendationRefreshHandler;
use crate::interventions::intervention_drafts;
use crate::patterns::{ab_test_drafts, is_relevant, pattern_drafts};
use crate::personalization::personalization_drafts;
use crate::ranking::rank;

pub struct RealtimeRecommendationEngine {
    config: RecommendationConfig,
    clock: Arc<dyn Clock>,
    events: Arc<EventDispatcher>,
    cache: Option<Arc<PatternCacheManager>>,
    /// Latest snapshot per client.
    journeys: DashMap<String, ActiveClientJourney>,
    patterns: DashMap<String, SuccessPattern>,
    active: DashMap<String, Vec<RealTimeRecommendation>>,
    handler_id: Mutex<Option<HandlerId>>,
}

impl RealtimeRecommendationEngine {
    pub fn new(config: RecommendationConfig, clock: Arc<dyn Clock>, events: Arc<EventDispatcher>) -> Self {
        Self {
            config,
            clock,
            events,
            cache: None,
            journeys: DashMap::new(),
            patterns: DashMap::new(),
            active: DashMap::new(),
            handler_id: Mutex::new(None),
        }
    }

    /// Cache alerts and recommendation lists through `cache`.
    pub fn with_cache(mut self, cache: Arc<PatternCacheManager>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Subscribe to `patterns_updated` on the shared dispatcher.
    pub fn attach(self: &Arc<Self>) {
        let handler = Arc::new(RecommendationRefreshHandler::new(Arc::downgrade(self)));
        let id = self.events.register(handler);
        if let Some(previous) = self
            .handler_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(id)
        {
            self.events.unregister(previous);
        }
    }

    pub fn detach(&self) {
        if let Some(id) = self
            .handler_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            self.events.unregister(id);
        }
    }

    /// Record a journey snapshot and return fresh recommendations for it.
    pub fn update_client_journey(&self, journey: ActiveClientJourney) -> Vec<RealTimeRecommendation> {
        let hesitating = match self.journeys.get(&journey.client_id) {
            Some(previous) => self.is_hesitating(&previous, &journey),
            None => false,
        };
        self.journeys.insert(journey.client_id.clone(), journey.clone());
        self.refresh(&journey, hesitating)
    }

    /// Same page on two consecutive updates, far enough apart.
    fn is_hesitating(&self, previous: &ActiveClientJourney, current: &ActiveClientJourney) -> bool {
        previous.session_id == current.session_id
            && previous.current_page == current.current_page
            && current.updated_at - previous.updated_at > Duration::seconds(self.config.hesitation_secs)
    }

    fn refresh(&self, journey: &ActiveClientJourney, hesitating: bool) -> Vec<RealTimeRecommendation> {
        let now = self.clock.now();
        let recommendations = self.generate(journey, hesitating, now);

        self.raise_alerts(journey, &recommendations, now);
        self.active
            .insert(journey.client_id.clone(), recommendations.clone());
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.cache_recommendations(&journey.client_id, recommendations.clone()) {
                tracing::warn!(client_id = %journey.client_id, error = %e, "failed to cache recommendations");
            }
        }

        tracing::debug!(
            client_id = %journey.client_id,
            count = recommendations.len(),
            hesitating,
            "recommendations generated"
        );
        self.events
            .emit_recommendations_generated(&RecommendationsGeneratedEvent {
                client_id: journey.client_id.clone(),
                recommendations: recommendations.clone(),
            });
        recommendations
    }

    fn generate(
        &self,
        journey: &ActiveClientJourney,
        hesitating: bool,
        now: DateTime<Utc>,
    ) -> Vec<RealTimeRecommendation> {
        let patterns = self.sorted_patterns();

        let mut drafts: Vec<Draft> = intervention_drafts(&self.config, journey, hesitating);
        drafts.extend(pattern_drafts(&self.config, journey, &patterns));
        drafts.extend(ab_test_drafts(&self.config, journey, &patterns));
        drafts.extend(personalization_drafts(&self.config, journey, &patterns));

        let intervention_ttl = Duration::seconds(self.config.intervention_ttl_secs);
        let recommendation_ttl = Duration::seconds(self.config.recommendation_ttl_secs);
        rank(
            drafts,
            self.config.min_expected_impact,
            self.config.max_recommendations_per_session,
        )
        .into_iter()
        .map(|draft| {
            let ttl = if draft.kind == RecommendationType::Intervention {
                intervention_ttl
            } else {
                recommendation_ttl
            };
            draft.finish(journey, now, ttl)
        })
        .collect()
    }

    /// Local patterns, best confidence first, ties by id.
    fn sorted_patterns(&self) -> Vec<SuccessPattern> {
        let mut patterns: Vec<SuccessPattern> =
            self.patterns.iter().map(|p| p.value().clone()).collect();
        patterns.sort_by(|a, b| {
            b.confidence_score
                .total_cmp(&a.confidence_score)
                .then_with(|| a.id.cmp(&b.id))
        });
        patterns
    }

    /// Critical interventions become dashboard alerts cached per client.
    /// Alerts past the cache's alert TTL are dropped and a repeated trigger
    /// replaces its earlier alert.
    fn raise_alerts(
        &self,
        journey: &ActiveClientJourney,
        recommendations: &[RealTimeRecommendation],
        now: DateTime<Utc>,
    ) {
        let Some(cache) = &self.cache else { return };
        let new_alerts: Vec<PatternAlert> = recommendations
            .iter()
            .filter(|r| {
                r.recommendation_type == RecommendationType::Intervention
                    && r.priority == RecommendationPriority::Critical
            })
            .map(|r| PatternAlert {
                id: uuid::Uuid::new_v4().to_string(),
                client_id: journey.client_id.clone(),
                severity: AlertSeverity::Critical,
                title: r.title.clone(),
                message: format!("{}: {}", r.title, r.recommendation),
                pattern_ids: r.based_on_patterns.clone(),
                created_at: now,
            })
            .collect();
        if new_alerts.is_empty() {
            return;
        }
        let ttl = cache.config().alert_ttl();
        let mut alerts: Vec<PatternAlert> = cache
            .get_alerts(&journey.client_id)
            .unwrap_or_default()
            .into_iter()
            .filter(|a| !a.is_expired(now, ttl))
            .filter(|a| new_alerts.iter().all(|n| n.title != a.title))
            .collect();
        alerts.extend(new_alerts);
        if let Err(e) = cache.cache_alerts(&journey.client_id, alerts) {
            tracing::warn!(client_id = %journey.client_id, error = %e, "failed to cache alerts");
        }
    }

    /// Upsert patterns into the local cache; inactive patterns are dropped.
    pub fn update_pattern_cache<'a>(&self, patterns: impl IntoIterator<Item = &'a SuccessPattern>) {
        for pattern in patterns {
            if pattern.is_active {
                self.patterns.insert(pattern.id.clone(), pattern.clone());
            } else {
                self.patterns.remove(&pattern.id);
            }
        }
    }

    /// Refresh the local pattern cache from `update` and re-evaluate every
    /// journey the changed patterns apply to. Returns how many journeys were
    /// re-evaluated.
    pub fn process_pattern_update(&self, update: &PatternUpdateResult) -> usize {
        self.update_pattern_cache(update.patterns());
        let changed: Vec<&SuccessPattern> = update.patterns().collect();
        if changed.is_empty() {
            return 0;
        }

        let affected: Vec<ActiveClientJourney> = self
            .journeys
            .iter()
            .map(|j| j.value().clone())
            .filter(|j| {
                let segments = j.segments();
                update.affected_clients.contains(&j.client_id)
                    || changed.iter().any(|p| is_relevant(p, &segments))
            })
            .collect();

        for journey in &affected {
            self.refresh(journey, false);
        }
        tracing::debug!(journeys = affected.len(), "journeys re-evaluated after pattern update");
        affected.len()
    }

    /// Non-expired recommendations currently held for a client.
    pub fn active_recommendations(&self, client_id: &str) -> Vec<RealTimeRecommendation> {
        let now = self.clock.now();
        self.active
            .get(client_id)
            .map(|recs| recs.iter().filter(|r| !r.is_expired(now)).cloned().collect())
            .unwrap_or_default()
    }

    pub fn journey(&self, client_id: &str) -> Option<ActiveClientJourney> {
        self.journeys.get(client_id).map(|j| j.value().clone())
    }

    /// Forget a client's journey and recommendations. Returns whether a journey existed.
    pub fn end_session(&self, client_id: &str) -> bool {
        self.active.remove(client_id);
        self.journeys.remove(client_id).is_some()
    }

    /// Drop journeys not updated within the idle timeout.
    pub fn prune_idle_journeys(&self) -> usize {
        let cutoff = self.clock.now() - Duration::seconds(self.config.journey_idle_timeout_secs);
        let idle: Vec<String> = self
            .journeys
            .iter()
            .filter(|j| j.updated_at < cutoff)
            .map(|j| j.key().clone())
            .collect();
        for client_id in &idle {
            self.end_session(client_id);
        }
        if !idle.is_empty() {
            tracing::debug!(pruned = idle.len(), "idle journeys pruned");
        }
        idle.len()
    }

    pub fn active_journeys(&self) -> usize {
        self.journeys.len()
    }

    pub fn tracked_patterns(&self) -> usize {
        self.patterns.len()
    }

    /// Drop all journeys, patterns, and recommendations and detach from events.
    pub fn dispose(&self) {
        self.detach();
        self.journeys.clear();
        self.patterns.clear();
        self.active.clear();
    }
}
