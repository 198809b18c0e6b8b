//! Metrics hooks for linkage operations
//!
//! Provides instrumentation points for monitoring hashing volume, filter
//! construction and candidate scans.
//!
//! ## Usage
//!
//! ```ignore
//! use pprl_engine::metrics::Metrics;
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(Metrics::new());
//! let service = PprlService::with_metrics(config, metrics.clone());
//! service.perform_pprl(&request, &candidates);
//! println!("{:?}", metrics.snapshot());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for linkage operations
///
/// Thread-safe counters, safe to share across parallel scans.
#[derive(Default)]
pub struct Metrics {
    /// Total field digests computed
    pub fields_hashed: AtomicU64,
    /// Total Bloom filters built
    pub filters_built: AtomicU64,
    /// Total filter bits allocated across built filters
    pub bits_allocated: AtomicU64,
    /// Total candidate records compared
    pub candidates_compared: AtomicU64,
    /// Scans that produced a match
    pub matches_found: AtomicU64,
    /// Scans that produced no match
    pub matches_missed: AtomicU64,
    /// Scans aborted by a deadline
    pub deadlines_exceeded: AtomicU64,
    /// Cumulative scan time in nanoseconds
    pub scan_time_ns: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_field_hashed(&self) {
        self.fields_hashed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record filter construction
    ///
    /// # Arguments
    /// * `size_bits` - Filter size in bits
    pub fn record_filter_built(&self, size_bits: usize) {
        self.filters_built.fetch_add(1, Ordering::Relaxed);
        self.bits_allocated.fetch_add(size_bits as u64, Ordering::Relaxed);
    }

    /// Record a completed scan
    ///
    /// # Arguments
    /// * `duration` - Wall time of the scan
    /// * `candidates` - Number of candidates compared
    /// * `matched` - Whether a candidate qualified
    pub fn record_scan(&self, duration: Duration, candidates: usize, matched: bool) {
        self.candidates_compared.fetch_add(candidates as u64, Ordering::Relaxed);
        self.scan_time_ns.fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        if matched {
            self.matches_found.fetch_add(1, Ordering::Relaxed);
        } else {
            self.matches_missed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_deadline_exceeded(&self, scanned: usize) {
        self.deadlines_exceeded.fetch_add(1, Ordering::Relaxed);
        self.candidates_compared.fetch_add(scanned as u64, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            fields_hashed: self.fields_hashed.load(Ordering::Relaxed),
            filters_built: self.filters_built.load(Ordering::Relaxed),
            bits_allocated: self.bits_allocated.load(Ordering::Relaxed),
            candidates_compared: self.candidates_compared.load(Ordering::Relaxed),
            matches_found: self.matches_found.load(Ordering::Relaxed),
            matches_missed: self.matches_missed.load(Ordering::Relaxed),
            deadlines_exceeded: self.deadlines_exceeded.load(Ordering::Relaxed),
            avg_scan_ns: self.avg_scan_time_ns(),
        }
    }

    /// Average scan time in nanoseconds over completed scans
    pub fn avg_scan_time_ns(&self) -> u64 {
        let total = self.scan_time_ns.load(Ordering::Relaxed);
        let scans = self.matches_found.load(Ordering::Relaxed)
            + self.matches_missed.load(Ordering::Relaxed);
        if scans > 0 {
            total / scans
        } else {
            0
        }
    }

    /// Fraction of completed scans that found a match
    pub fn match_rate(&self) -> f64 {
        let found = self.matches_found.load(Ordering::Relaxed);
        let scans = found + self.matches_missed.load(Ordering::Relaxed);
        if scans > 0 {
            found as f64 / scans as f64
        } else {
            0.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.fields_hashed.store(0, Ordering::Relaxed);
        self.filters_built.store(0, Ordering::Relaxed);
        self.bits_allocated.store(0, Ordering::Relaxed);
        self.candidates_compared.store(0, Ordering::Relaxed);
        self.matches_found.store(0, Ordering::Relaxed);
        self.matches_missed.store(0, Ordering::Relaxed);
        self.deadlines_exceeded.store(0, Ordering::Relaxed);
        self.scan_time_ns.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub fields_hashed: u64,
    pub filters_built: u64,
    pub bits_allocated: u64,
    pub candidates_compared: u64,
    pub matches_found: u64,
    pub matches_missed: u64,
    pub deadlines_exceeded: u64,
    pub avg_scan_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to integrate with external metrics systems
/// like Prometheus, StatsD, or OpenTelemetry.
pub trait MetricsRecorder: Send + Sync {
    fn record_field_hashed(&self);

    fn record_filter_built(&self, size_bits: usize);

    fn record_scan(&self, duration: Duration, candidates: usize, matched: bool);

    fn record_deadline_exceeded(&self, scanned: usize);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_field_hashed(&self) {}
    fn record_filter_built(&self, _: usize) {}
    fn record_scan(&self, _: Duration, _: usize, _: bool) {}
    fn record_deadline_exceeded(&self, _: usize) {}
}

impl MetricsRecorder for Metrics {
    fn record_field_hashed(&self) {
        Metrics::record_field_hashed(self);
    }

    fn record_filter_built(&self, size_bits: usize) {
        Metrics::record_filter_built(self, size_bits);
    }

    fn record_scan(&self, duration: Duration, candidates: usize, matched: bool) {
        Metrics::record_scan(self, duration, candidates, matched);
    }

    fn record_deadline_exceeded(&self, scanned: usize) {
        Metrics::record_deadline_exceeded(self, scanned);
    }
}
