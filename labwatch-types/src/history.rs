//! Bounded history buffers for chart series and log panes.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default number of samples a chart series keeps.
pub const DEFAULT_SERIES_CAPACITY: usize = 20;

/// A fixed-capacity append-only buffer that evicts its oldest entries.
///
/// For any sequence of pushes the buffer holds the last `capacity` items
/// in push order: after `n` pushes its length is `min(n, capacity)`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedBuffer<T> {
    /// Create an empty buffer with the given capacity.
    ///
    /// A zero capacity is allowed; such a buffer discards everything.
    pub fn new(capacity: usize) -> Self {
        Self { items: VecDeque::with_capacity(capacity), capacity }
    }

    /// Append an item, evicting from the front once over capacity.
    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
        while self.items.len() > self.capacity {
            self.items.pop_front();
        }
    }

    /// Number of items currently held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recently pushed item.
    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Drop all items, keeping the capacity.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Clone> BoundedBuffer<T> {
    /// Copy out the contents, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

/// One timestamped sample in a chart series. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Epoch milliseconds.
    pub timestamp_ms: u64,
    pub value: f64,
}

/// A chronologically ordered, capacity-bounded series of samples.
///
/// Insertion order is chronological order; callers push samples as they
/// observe them and the series drops the oldest beyond capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySeries {
    points: BoundedBuffer<HistoryPoint>,
}

impl HistorySeries {
    /// Create a series with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self { points: BoundedBuffer::new(capacity) }
    }

    /// Append a sample.
    pub fn push(&mut self, point: HistoryPoint) {
        self.points.push(point);
    }

    /// Append a sample from its parts.
    pub fn record(&mut self, timestamp_ms: u64, value: f64) {
        self.push(HistoryPoint { timestamp_ms, value });
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.points.capacity()
    }

    /// The newest sample.
    pub fn latest(&self) -> Option<HistoryPoint> {
        self.points.latest().copied()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.points.iter()
    }

    /// Just the values, oldest first - what a sparkline or chart consumes.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl Default for HistorySeries {
    fn default() -> Self {
        Self::new(DEFAULT_SERIES_CAPACITY)
    }
}
