//! Fixed-capacity rolling window.

use std::collections::VecDeque;

/// Buffer of the last N observed values.
///
/// `is_ready` flips to true the first time the window holds N values and
/// stays true afterwards, so warm-up checks are O(1).
#[derive(Debug, Clone)]
pub struct RollingWindow {
    values: VecDeque<f64>,
    capacity: usize,
    ready: bool,
}

impl RollingWindow {
    /// Create a new window holding `capacity` values.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
            ready: false,
        }
    }

    /// Push a value, evicting and returning the oldest once full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        let evicted = if self.values.len() == self.capacity {
            self.values.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        if !self.ready && self.values.len() == self.capacity {
            self.ready = true;
        }
        evicted
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently pushed value.
    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// Maximum over the window, or None while empty.
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    /// Minimum over the window, or None while empty.
    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    /// Clear all values and the ready flag.
    pub fn clear(&mut self) {
        self.values.clear();
        self.ready = false;
    }
}
