// Bounded sliding window of derived samples
use std::collections::VecDeque;

use super::telemetry::DerivedSample;

/// Ten minutes of history at the 5-second cadence.
pub const WINDOW_CAPACITY: usize = 120;

/// Insertion-ordered (oldest first) FIFO window. Pushing past capacity
/// evicts from the front; there is no other way to remove samples.
#[derive(Debug, Clone)]
pub struct WindowBuffer {
    samples: VecDeque<DerivedSample>,
    capacity: usize,
}

impl Default for WindowBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowBuffer {
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: DerivedSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &DerivedSample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&DerivedSample> {
        self.samples.back()
    }

    /// Owned, ordered copy for readers.
    pub fn snapshot(&self) -> Vec<DerivedSample> {
        self.samples.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
