//! Bounded sample history.

use std::collections::VecDeque;

/// Default number of samples kept by multi-rate controllers.
pub const HISTORY_CAPACITY: usize = 20;

/// A fixed-capacity trailing window of samples.
///
/// Pushing into a full window drops the oldest sample first.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl History {
    /// Create an empty window holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest if the window is full.
    pub fn push(&mut self, sample: f64) {
        if self.capacity == 0 {
            return;
        }
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Mean of the held samples, or `None` when empty.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    /// Number of held samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drop every sample.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn drops_oldest_when_full() {
        let mut h = History::new(3);
        for x in [1.0, 2.0, 3.0, 4.0, 5.0] {
            h.push(x);
        }
        assert_eq!(h.len(), 3);
        assert!((h.mean().unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn empty_window_has_no_mean() {
        let mut h = History::default();
        assert!(h.mean().is_none());
        h.push(0.5);
        h.clear();
        assert!(h.is_empty());
        assert!(h.mean().is_none());
    }
}
