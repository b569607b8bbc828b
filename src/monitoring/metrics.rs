use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

#[derive(Default)]
struct MetricsInner {
    snapshots_loaded: AtomicU64,
    records_loaded: AtomicU64,
    records_classified: AtomicU64,
    records_excluded: AtomicU64,
    reports_rendered: AtomicU64,
}

/// Counters for a single report run.
///
/// Owned by the caller and handed down explicitly; there is no process-wide
/// registry. Cloning shares the same counters.
#[derive(Clone, Default)]
pub struct RunMetrics {
    inner: Arc<MetricsInner>,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_snapshot(&self, snapshot: &str, records: usize) {
        self.inner.snapshots_loaded.fetch_add(1, Ordering::Relaxed);
        self.inner
            .records_loaded
            .fetch_add(records as u64, Ordering::Relaxed);

        info!(
            target: "metrics",
            event = "snapshot_loaded",
            snapshot = %snapshot,
            records,
            "snapshot loaded"
        );
    }

    pub fn record_classification(&self, classified: usize, excluded: usize) {
        self.inner
            .records_classified
            .fetch_add(classified as u64, Ordering::Relaxed);
        self.inner
            .records_excluded
            .fetch_add(excluded as u64, Ordering::Relaxed);

        info!(
            target: "metrics",
            event = "ledger_classified",
            classified,
            excluded,
            "ledger classified"
        );
    }

    pub fn record_report(&self) {
        self.inner.reports_rendered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            snapshots_loaded: self.inner.snapshots_loaded.load(Ordering::Relaxed),
            records_loaded: self.inner.records_loaded.load(Ordering::Relaxed),
            records_classified: self.inner.records_classified.load(Ordering::Relaxed),
            records_excluded: self.inner.records_excluded.load(Ordering::Relaxed),
            reports_rendered: self.inner.reports_rendered.load(Ordering::Relaxed),
        }
    }
}

/// Serializable view of the run counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub snapshots_loaded: u64,
    pub records_loaded: u64,
    pub records_classified: u64,
    pub records_excluded: u64,
    pub reports_rendered: u64,
}

pub fn log_metrics_snapshot(snapshot: &MetricsSnapshot) {
    info!(
        target: "metrics",
        event = "metrics_snapshot",
        snapshots_loaded = snapshot.snapshots_loaded,
        records_loaded = snapshot.records_loaded,
        records_classified = snapshot.records_classified,
        records_excluded = snapshot.records_excluded,
        reports_rendered = snapshot.reports_rendered,
        "metrics snapshot"
    );
}
