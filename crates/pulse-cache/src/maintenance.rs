//! Background maintenance: periodic expiry sweep and batch debounce.
//!
//! The task holds only a weak reference to the manager and exits once the
//! manager is dropped or disposed.

use std::sync::{Arc, PoisonError};

use pulse_core::errors::{CacheError, PulseResult};
use tokio::time::{self, MissedTickBehavior};

use crate::manager::PatternCacheManager;

impl PatternCacheManager {
    /// Start the maintenance task on the current tokio runtime. Calling it
    /// again replaces the running task.
    pub fn spawn_maintenance(self: &Arc<Self>) -> PulseResult<()> {
        if self.is_disposed() {
            return Err(CacheError::Disposed.into());
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| CacheError::NoRuntime {
            reason: e.to_string(),
        })?;

        let weak = self.downgrade();
        let cleanup_every = self.config().cleanup_interval();
        let batch_window = self.config().batch_window();

        let task = runtime.spawn(async move {
            let mut cleanup = time::interval(cleanup_every);
            cleanup.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                let Some(manager) = weak.upgrade() else { break };
                if manager.is_disposed() {
                    break;
                }
                tokio::select! {
                    _ = cleanup.tick() => {
                        manager.cleanup_expired();
                    }
                    _ = manager.batch_notify.notified() => {
                        // Restart the window on every new arrival.
                        while time::timeout(batch_window, manager.batch_notify.notified())
                            .await
                            .is_ok()
                        {}
                        manager.flush_pending();
                    }
                }
            }
            tracing::debug!("cache maintenance stopped");
        });

        if let Some(previous) = self
            .maintenance
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(task)
        {
            previous.abort();
        }
        Ok(())
    }

    pub fn maintenance_running(&self) -> bool {
        self.maintenance
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}
