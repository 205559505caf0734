// =============================================================================
// Central Application State
// =============================================================================
//
// Shared across handlers via `Arc<AppState>`.
//
//   - `models` starts empty and is installed exactly once, after every
//     artifact has loaded. Until then the service answers "not ready".
//   - Counters are atomics; nothing on the request path takes a write lock.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::LoadedModels;
use crate::orchestrator::PredictionOrchestrator;
use crate::runtime_config::ServiceConfig;

pub struct AppState {
    pub config: ServiceConfig,

    models: RwLock<Option<Arc<LoadedModels>>>,

    pub predictions_served: AtomicU64,
    pub validation_failures: AtomicU64,
    pub internal_failures: AtomicU64,

    /// Instant the process started. Used for uptime.
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            models: RwLock::new(None),
            predictions_served: AtomicU64::new(0),
            validation_failures: AtomicU64::new(0),
            internal_failures: AtomicU64::new(0),
            start_time: std::time::Instant::now(),
        }
    }

    /// Install the loaded models. Returns `false` (and keeps the first set)
    /// if models were already installed.
    pub fn install_models(&self, models: LoadedModels) -> bool {
        let mut slot = self.models.write();
        if slot.is_some() {
            return false;
        }
        *slot = Some(Arc::new(models));
        true
    }

    pub fn models(&self) -> Option<Arc<LoadedModels>> {
        self.models.read().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.models.read().is_some()
    }

    /// Orchestrator bound to the installed models, if any.
    pub fn orchestrator(&self) -> Option<PredictionOrchestrator> {
        self.models().map(PredictionOrchestrator::new)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn record_success(&self) {
        self.predictions_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, validation: bool) {
        let counter = if validation {
            &self.validation_failures
        } else {
            &self.internal_failures
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}
