//! Dashboard counters
//!
//! Counters only, monotonic, reset on process start.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Atomic counters shared by the dashboard handlers
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    uploads_received: AtomicU64,
    uploads_rejected: AtomicU64,
    explain_runs: AtomicU64,
    explain_failures: AtomicU64,
    rows_explained: AtomicU64,
    model_load_failures: AtomicU64,
    exports_served: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_uploads_received(&self) {
        self.uploads_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_uploads_rejected(&self) {
        self.uploads_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed run over `rows` rows
    pub fn record_explain_run(&self, rows: u64) {
        self.explain_runs.fetch_add(1, Ordering::Relaxed);
        self.rows_explained.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn increment_explain_failures(&self) {
        self.explain_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_model_load_failures(&self) {
        self.model_load_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_exports_served(&self) {
        self.exports_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uploads_received: self.uploads_received.load(Ordering::Relaxed),
            uploads_rejected: self.uploads_rejected.load(Ordering::Relaxed),
            explain_runs: self.explain_runs.load(Ordering::Relaxed),
            explain_failures: self.explain_failures.load(Ordering::Relaxed),
            rows_explained: self.rows_explained.load(Ordering::Relaxed),
            model_load_failures: self.model_load_failures.load(Ordering::Relaxed),
            exports_served: self.exports_served.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub uploads_received: u64,
    pub uploads_rejected: u64,
    pub explain_runs: u64,
    pub explain_failures: u64,
    pub rows_explained: u64,
    pub model_load_failures: u64,
    pub exports_served: u64,
}
