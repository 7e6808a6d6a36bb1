//! Persistence seam. The relational store lives outside this workspace;
//! the engine only needs client history reads and pattern upserts.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::{PulseResult, StorageError};
use crate::models::{ContentOutcomeData, SuccessPattern};

pub trait OutcomeStore: Send + Sync {
    /// Most recent outcomes for a client, newest first, at most `limit`.
    fn client_history(&self, client_id: &str, limit: usize) -> PulseResult<Vec<ContentOutcomeData>>;

    /// Idempotent upsert keyed by `pattern.id`.
    fn save_pattern(&self, pattern: &SuccessPattern) -> PulseResult<()>;

    /// Every pattern with `is_active == true`.
    fn active_patterns(&self) -> PulseResult<Vec<SuccessPattern>>;
}

/// In-memory store for tests and single-process embedding.
#[derive(Debug, Default)]
pub struct InMemoryOutcomeStore {
    outcomes: RwLock<Vec<ContentOutcomeData>>,
    patterns: RwLock<HashMap<String, SuccessPattern>>,
}

impl InMemoryOutcomeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_outcome(&self, outcome: ContentOutcomeData) -> PulseResult<()> {
        self.outcomes
            .write()
            .map_err(|_| StorageError::LockPoisoned)?
            .push(outcome);
        Ok(())
    }

    pub fn pattern(&self, id: &str) -> PulseResult<Option<SuccessPattern>> {
        Ok(self
            .patterns
            .read()
            .map_err(|_| StorageError::LockPoisoned)?
            .get(id)
            .cloned())
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.read().map(|p| p.len()).unwrap_or(0)
    }
}

impl OutcomeStore for InMemoryOutcomeStore {
    fn client_history(&self, client_id: &str, limit: usize) -> PulseResult<Vec<ContentOutcomeData>> {
        let outcomes = self.outcomes.read().map_err(|_| StorageError::LockPoisoned)?;
        let mut history: Vec<ContentOutcomeData> = outcomes
            .iter()
            .filter(|o| o.client_id == client_id)
            .cloned()
            .collect();
        history.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        history.truncate(limit);
        Ok(history)
    }

    fn save_pattern(&self, pattern: &SuccessPattern) -> PulseResult<()> {
        self.patterns
            .write()
            .map_err(|_| StorageError::LockPoisoned)?
            .insert(pattern.id.clone(), pattern.clone());
        Ok(())
    }

    fn active_patterns(&self) -> PulseResult<Vec<SuccessPattern>> {
        let patterns = self.patterns.read().map_err(|_| StorageError::LockPoisoned)?;
        let mut active: Vec<SuccessPattern> =
            patterns.values().filter(|p| p.is_active).cloned().collect();
        active.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(active)
    }
}
