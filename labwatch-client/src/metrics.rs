//! Rolling metric history for the dashboard charts.
//!
//! Each chart series keeps the last twenty samples; a new sample past the
//! window evicts the oldest, so every chart shows a sliding view of recent
//! behaviour rather than an unbounded trace.

use std::time::{SystemTime, UNIX_EPOCH};

use labwatch_types::{HistorySeries, DEFAULT_SERIES_CAPACITY};

/// The per-host metric series the dashboard charts.
///
/// Samples are stamped with the wall-clock time at which they were
/// recorded, in epoch milliseconds, matching the store's timestamp unit.
#[derive(Debug, Clone, Default)]
pub struct MetricsHistory {
    cpu: HistorySeries,
    memory: HistorySeries,
    containers: HistorySeries,
}

impl MetricsHistory {
    /// Create a history with the default per-series capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SERIES_CAPACITY)
    }

    /// Create a history with a custom per-series capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cpu: HistorySeries::new(capacity),
            memory: HistorySeries::new(capacity),
            containers: HistorySeries::new(capacity),
        }
    }

    /// Record a CPU utilization sample (percent).
    pub fn record_cpu(&mut self, percent: f64) {
        self.cpu.record(now_ms(), percent);
    }

    /// Record a memory utilization sample (percent).
    pub fn record_memory(&mut self, percent: f64) {
        self.memory.record(now_ms(), percent);
    }

    /// Record a running-container count sample.
    pub fn record_containers(&mut self, running: u32) {
        self.containers.record(now_ms(), f64::from(running));
    }

    pub fn cpu(&self) -> &HistorySeries {
        &self.cpu
    }

    pub fn memory(&self) -> &HistorySeries {
        &self.memory
    }

    pub fn containers(&self) -> &HistorySeries {
        &self.containers
    }

    /// Drop all samples, keeping the capacities.
    pub fn clear(&mut self) {
        self.cpu.clear();
        self.memory.clear();
        self.containers.clear();
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_start_empty() {
        let history = MetricsHistory::new();
        assert!(history.cpu().is_empty());
        assert!(history.memory().is_empty());
        assert!(history.containers().is_empty());
        assert_eq!(history.cpu().capacity(), DEFAULT_SERIES_CAPACITY);
    }

    #[test]
    fn test_window_slides_after_capacity() {
        let mut history = MetricsHistory::new();
        for i in 0..25 {
            history.record_cpu(f64::from(i));
        }

        assert_eq!(history.cpu().len(), 20);
        let values = history.cpu().values();
        assert_eq!(values.first(), Some(&5.0));
        assert_eq!(values.last(), Some(&24.0));
    }

    #[test]
    fn test_series_are_independent() {
        let mut history = MetricsHistory::new();
        history.record_cpu(37.5);
        history.record_containers(12);

        assert_eq!(history.cpu().len(), 1);
        assert_eq!(history.containers().len(), 1);
        assert!(history.memory().is_empty());
        assert_eq!(history.containers().latest().map(|p| p.value), Some(12.0));
    }

    #[test]
    fn test_timestamps_are_recent_epoch_millis() {
        let before = now_ms();
        let mut history = MetricsHistory::new();
        history.record_memory(61.2);
        let after = now_ms();

        let point = history.memory().latest().unwrap();
        assert!(point.timestamp_ms >= before && point.timestamp_ms <= after);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut history = MetricsHistory::with_capacity(4);
        for _ in 0..6 {
            history.record_cpu(1.0);
        }
        history.clear();

        assert!(history.cpu().is_empty());
        assert_eq!(history.cpu().capacity(), 4);
    }
}
