//! Shared application state for the HTTP handlers.
//!
//! Holds the validated config, the metric set the simulator writes into, and
//! the draining flag flipped when graceful shutdown begins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bizmetrics_core::MetricSet;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<MetricSet>,
}

struct AppStateInner {
    cfg: AppConfig,
    draining: AtomicBool,
}

impl AppState {
    pub fn new(cfg: AppConfig, metrics: Arc<MetricSet>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                draining: AtomicBool::new(false),
            }),
            metrics,
        }
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> Arc<MetricSet> {
        Arc::clone(&self.metrics)
    }

    /// Mark draining state.
    pub fn set_draining(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
    }

    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }
}
