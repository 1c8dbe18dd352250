//! Rolling median filter for GPS altitude.
//!
//! GPS altitude is the noisiest channel a receiver reports. A short median
//! window removes single-fix spikes without lagging behind real gradients the
//! way a mean would.

use std::collections::VecDeque;

/// Default number of samples kept in the window.
pub const DEFAULT_ALTITUDE_WINDOW: usize = 5;

/// Bounded FIFO of raw altitude samples with a median read-out.
#[derive(Debug, Clone)]
pub struct AltitudeSmoother {
    capacity: usize,
    samples: VecDeque<f64>,
}

impl AltitudeSmoother {
    /// Create a smoother holding at most `capacity` samples (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::new(),
        }
    }

    /// Push a sample, evicting the oldest when over capacity.
    ///
    /// Non-finite samples are dropped so one bad reading cannot poison the median.
    pub fn push(&mut self, altitude_m: f64) {
        if !altitude_m.is_finite() {
            return;
        }
        self.samples.push_back(altitude_m);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Median of the current window, 0 when empty.
    pub fn smoothed(&self) -> f64 {
        median(self.samples.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for AltitudeSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_ALTITUDE_WINDOW)
    }
}

/// Median of a set of values; mean of the two middle values for even counts.
pub fn median(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sorted: Vec<f64> = values.into_iter().collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_capacity_allocates_lazily() {
        let mut smoother = AltitudeSmoother::new(usize::MAX);
        smoother.push(410.0);
        assert_eq!(smoother.capacity(), usize::MAX);
        assert_eq!(smoother.smoothed(), 410.0);
    }

    #[test]
    fn test_empty_window_is_zero() {
        let smoother = AltitudeSmoother::default();
        assert_eq!(smoother.smoothed(), 0.0);
        assert!(smoother.is_empty());
    }

    #[test]
    fn test_odd_window_median() {
        let mut smoother = AltitudeSmoother::default();
        for alt in [100.0, 300.0, 102.0] {
            smoother.push(alt);
        }
        assert_eq!(smoother.smoothed(), 102.0);
    }

    #[test]
    fn test_even_window_averages_middle_pair() {
        let mut smoother = AltitudeSmoother::default();
        for alt in [10.0, 40.0, 20.0, 30.0] {
            smoother.push(alt);
        }
        assert_eq!(smoother.smoothed(), 25.0);
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut smoother = AltitudeSmoother::default();
        for alt in [1000.0, 1.0, 2.0, 3.0, 4.0, 5.0] {
            smoother.push(alt);
        }
        assert_eq!(smoother.len(), 5);
        // The 1000 m outlier was pushed first and is gone
        assert_eq!(smoother.smoothed(), 3.0);
    }

    #[test]
    fn test_spike_rejected() {
        let mut smoother = AltitudeSmoother::default();
        for alt in [50.0, 51.0, 250.0, 52.0, 53.0] {
            smoother.push(alt);
        }
        assert_eq!(smoother.smoothed(), 52.0);
    }

    #[test]
    fn test_non_finite_samples_ignored() {
        let mut smoother = AltitudeSmoother::default();
        smoother.push(12.0);
        smoother.push(f64::NAN);
        smoother.push(f64::INFINITY);
        assert_eq!(smoother.len(), 1);
        assert_eq!(smoother.smoothed(), 12.0);
    }
}
