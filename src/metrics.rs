//! Activity metrics for highlighting and completion
//!
//! Lightweight in-memory counters, queried by the CLI and by tests. Updates are
//! lock-free atomics; per-operation timings live in a `DashMap` and keep only
//! the most recent [`MAX_TIMING_SAMPLES`] samples per operation.
//!
//! ## Metrics Tracked
//!
//! - Tokenize passes and tokens produced
//! - Completion requests answered vs suppressed
//! - Catalog cache hits and misses

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;

/// Timing samples retained per operation.
pub const MAX_TIMING_SAMPLES: usize = 1024;

/// Global metrics registry (singleton)
static METRICS: once_cell::sync::Lazy<Arc<Metrics>> = once_cell::sync::Lazy::new(|| {
    Arc::new(Metrics::new())
});

/// Get the global metrics instance
pub fn metrics() -> &'static Arc<Metrics> {
    &METRICS
}

#[derive(Debug)]
pub struct Metrics {
    tokenize_passes: AtomicU64,
    tokens_produced: AtomicU64,

    completions_offered: AtomicU64,
    completions_suppressed: AtomicU64,

    catalog_hits: AtomicU64,
    catalog_misses: AtomicU64,

    // operation name -> most recent durations in microseconds
    operation_timings: DashMap<String, VecDeque<u64>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            tokenize_passes: AtomicU64::new(0),
            tokens_produced: AtomicU64::new(0),
            completions_offered: AtomicU64::new(0),
            completions_suppressed: AtomicU64::new(0),
            catalog_hits: AtomicU64::new(0),
            catalog_misses: AtomicU64::new(0),
            operation_timings: DashMap::new(),
        }
    }

    /// Records one full tokenize pass producing `tokens` tokens
    pub fn record_tokenize(&self, tokens: usize) {
        self.tokenize_passes.fetch_add(1, Ordering::Relaxed);
        self.tokens_produced.fetch_add(tokens as u64, Ordering::Relaxed);
    }

    pub fn record_completion_offered(&self) {
        self.completions_offered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_completion_suppressed(&self) {
        self.completions_suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_catalog_hit(&self) {
        self.catalog_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_catalog_miss(&self) {
        self.catalog_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Gets the catalog cache hit rate (0.0 to 1.0)
    pub fn catalog_hit_rate(&self) -> f64 {
        let hits = self.catalog_hits.load(Ordering::Relaxed);
        let misses = self.catalog_misses.load(Ordering::Relaxed);
        let total = hits + misses;

        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    pub fn record_timing(&self, operation: &str, duration: Duration) {
        let micros = duration.as_micros() as u64;

        let mut samples = self
            .operation_timings
            .entry(operation.to_string())
            .or_insert_with(|| VecDeque::with_capacity(MAX_TIMING_SAMPLES));
        if samples.len() == MAX_TIMING_SAMPLES {
            samples.pop_front();
        }
        samples.push_back(micros);
    }

    /// Gets summary statistics over the retained samples of an operation
    pub fn operation_stats(&self, operation: &str) -> Option<OperationStats> {
        self.operation_timings.get(operation).and_then(|timings| {
            let mut sorted: Vec<u64> = timings.value().iter().copied().collect();
            if sorted.is_empty() {
                return None;
            }
            sorted.sort_unstable();

            let count = sorted.len();
            let sum: u64 = sorted.iter().sum();
            let p95_idx = (count as f64 * 0.95) as usize;

            Some(OperationStats {
                count,
                min_micros: sorted[0],
                max_micros: sorted[count - 1],
                mean_micros: sum / count as u64,
                p50_micros: sorted[count / 2],
                p95_micros: sorted[p95_idx.min(count - 1)],
            })
        })
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tokenize_passes: self.tokenize_passes.load(Ordering::Relaxed),
            tokens_produced: self.tokens_produced.load(Ordering::Relaxed),
            completions_offered: self.completions_offered.load(Ordering::Relaxed),
            completions_suppressed: self.completions_suppressed.load(Ordering::Relaxed),
            catalog_hits: self.catalog_hits.load(Ordering::Relaxed),
            catalog_misses: self.catalog_misses.load(Ordering::Relaxed),
            catalog_hit_rate: self.catalog_hit_rate(),
        }
    }

    /// Resets all metrics (useful for testing)
    pub fn reset(&self) {
        self.tokenize_passes.store(0, Ordering::Relaxed);
        self.tokens_produced.store(0, Ordering::Relaxed);
        self.completions_offered.store(0, Ordering::Relaxed);
        self.completions_suppressed.store(0, Ordering::Relaxed);
        self.catalog_hits.store(0, Ordering::Relaxed);
        self.catalog_misses.store(0, Ordering::Relaxed);
        self.operation_timings.clear();
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationStats {
    pub count: usize,
    pub min_micros: u64,
    pub max_micros: u64,
    pub mean_micros: u64,
    pub p50_micros: u64,  // Median
    pub p95_micros: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub tokenize_passes: u64,
    pub tokens_produced: u64,
    pub completions_offered: u64,
    pub completions_suppressed: u64,
    pub catalog_hits: u64,
    pub catalog_misses: u64,
    pub catalog_hit_rate: f64,
}

/// RAII guard for automatic timing measurement
///
/// Records the duration of a scope in the global registry when dropped.
///
/// # Example
///
/// ```
/// use wp_lang_tools::metrics::{metrics, TimingGuard};
///
/// {
///     let _guard = TimingGuard::new("doc_example");
/// }
/// assert!(metrics().operation_stats("doc_example").is_some());
/// ```
pub struct TimingGuard {
    operation: &'static str,
    start: Instant,
}

impl TimingGuard {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        metrics().record_timing(self.operation, self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_catalog_hit_rate() {
        let m = Metrics::new();

        assert_eq!(m.catalog_hit_rate(), 0.0);

        m.record_catalog_hit();
        m.record_catalog_hit();
        m.record_catalog_miss();

        assert_eq!(m.catalog_hit_rate(), 2.0 / 3.0);
    }

    #[test]
    fn test_counters() {
        let m = Metrics::new();

        m.record_tokenize(12);
        m.record_tokenize(3);
        m.record_completion_offered();
        m.record_completion_suppressed();
        m.record_completion_suppressed();

        let snapshot = m.snapshot();
        assert_eq!(snapshot.tokenize_passes, 2);
        assert_eq!(snapshot.tokens_produced, 15);
        assert_eq!(snapshot.completions_offered, 1);
        assert_eq!(snapshot.completions_suppressed, 2);
    }

    #[test]
    fn test_operation_timing() {
        let m = Metrics::new();

        m.record_timing("test_op", Duration::from_micros(100));
        m.record_timing("test_op", Duration::from_micros(200));
        m.record_timing("test_op", Duration::from_micros(150));

        let stats = m.operation_stats("test_op").unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min_micros, 100);
        assert_eq!(stats.max_micros, 200);
        assert_eq!(stats.mean_micros, 150);
        assert_eq!(stats.p50_micros, 150);
        assert!(m.operation_stats("missing").is_none());
    }

    #[test]
    fn test_timing_window_is_bounded() {
        let m = Metrics::new();

        for micros in 0..(MAX_TIMING_SAMPLES as u64 * 3) {
            m.record_timing("hot", Duration::from_micros(micros));
        }

        let stats = m.operation_stats("hot").unwrap();
        assert_eq!(stats.count, MAX_TIMING_SAMPLES);
        // oldest samples were dropped
        assert_eq!(stats.min_micros, MAX_TIMING_SAMPLES as u64 * 2);
        assert_eq!(stats.max_micros, MAX_TIMING_SAMPLES as u64 * 3 - 1);
    }

    #[test]
    fn test_timing_guard() {
        {
            let _guard = TimingGuard::new("metrics_test_guard");
            thread::sleep(Duration::from_millis(5));
        }

        let stats = metrics().operation_stats("metrics_test_guard").unwrap();
        assert!(stats.count >= 1);
        assert!(stats.max_micros >= 5_000);
    }

    #[test]
    fn test_reset() {
        let m = Metrics::new();

        m.record_catalog_hit();
        m.record_tokenize(4);
        m.record_timing("test", Duration::from_micros(100));

        m.reset();

        let snapshot = m.snapshot();
        assert_eq!(snapshot.catalog_hits, 0);
        assert_eq!(snapshot.tokens_produced, 0);
        assert!(m.operation_stats("test").is_none());
    }
}
