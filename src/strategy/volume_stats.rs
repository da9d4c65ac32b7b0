//! Log-Volume Z-Score
//!
//! Rolling statistics over the natural log of bar volume. The z-score of the
//! current bar is measured against the trailing window *before* the bar is
//! added, so a spike is never diluted by itself.
//!
//! z = (ln(volume) - mean(window)) / std(window)
//!
//! Standard deviation is the sample (n - 1) estimate. Fewer than two stored
//! observations, or a flat window, yield z = 0.

use std::collections::VecDeque;

use statrs::statistics::Statistics;

use crate::domain::bar::{check_volume, BarError};

/// Below this the window is treated as constant
const MIN_STD_DEV: f64 = 1e-12;

/// Result of one log-volume observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeZScore {
    /// Z-score of the observation against the prior window
    pub z_score: f64,
    /// ln(volume) of the observation
    pub log_volume: f64,
    /// Window mean before the observation (0 when empty)
    pub mean: f64,
    /// Window standard deviation before the observation (0 when < 2 samples)
    pub std_dev: f64,
    /// Number of prior observations the statistics used
    pub samples: usize,
}

/// Trailing log-volume window with causal z-scores
#[derive(Debug, Clone)]
pub struct LogVolumeStats {
    capacity: usize,
    window: VecDeque<f64>,
}

impl LogVolumeStats {
    /// Create a window holding the last `capacity` log-volumes
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            window: VecDeque::new(),
        }
    }

    /// Add a volume and return its z-score
    pub fn update(&mut self, volume: f64) -> Result<f64, BarError> {
        self.observe(volume).map(|r| r.z_score)
    }

    /// Add a volume and return the z-score with the statistics behind it.
    ///
    /// A non-positive or non-finite volume is rejected and the window is left untouched.
    pub fn observe(&mut self, volume: f64) -> Result<VolumeZScore, BarError> {
        check_volume(volume)?;
        let log_volume = volume.ln();
        let result = self.score(log_volume);

        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(log_volume);

        Ok(result)
    }

    fn score(&self, log_volume: f64) -> VolumeZScore {
        let samples = self.window.len();
        if samples < 2 {
            let mean = if samples == 1 { self.window[0] } else { 0.0 };
            return VolumeZScore { z_score: 0.0, log_volume, mean, std_dev: 0.0, samples };
        }

        let mean = self.window.iter().mean();
        let std_dev = self.window.iter().std_dev();

        let z_score = if std_dev > MIN_STD_DEV {
            (log_volume - mean) / std_dev
        } else {
            0.0
        };

        VolumeZScore { z_score, log_volume, mean, std_dev, samples }
    }

    /// Reset the window
    pub fn reset(&mut self) {
        self.window.clear();
    }

    /// Number of stored log-volumes
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Check if the window is at capacity
    pub fn is_ready(&self) -> bool {
        self.window.len() >= self.capacity
    }

    /// Stored log-volumes, oldest first
    pub fn log_volumes(&self) -> impl Iterator<Item = f64> + '_ {
        self.window.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_observations_score_zero() {
        let mut stats = LogVolumeStats::new(5);
        assert_eq!(stats.update(100.0).unwrap(), 0.0);
        assert_eq!(stats.update(5_000.0).unwrap(), 0.0);
        assert_eq!(stats.len(), 2);
        // Two prior samples now exist
        assert!(stats.update(100.0).unwrap() != 0.0);
    }

    #[test]
    fn test_constant_volume_scores_zero() {
        let mut stats = LogVolumeStats::new(10);
        for _ in 0..50 {
            let z = stats.update(1_234.5).unwrap();
            assert_eq!(z, 0.0);
            assert!(z.is_finite());
        }
    }

    #[test]
    fn test_spike_after_constant_window_scores_zero() {
        // Prior window is flat, so sigma is zero and no division happens
        let mut stats = LogVolumeStats::new(10);
        for _ in 0..10 {
            stats.update(100.0).unwrap();
        }
        assert_eq!(stats.update(1_000_000.0).unwrap(), 0.0);
    }

    #[test]
    fn test_zscore_excludes_current_observation() {
        let mut stats = LogVolumeStats::new(10);
        let volumes = [1.0_f64.exp(), 2.0_f64.exp(), 3.0_f64.exp()];
        for v in volumes {
            stats.update(v).unwrap();
        }

        // Prior logs: 1, 2, 3 -> mean 2, sample std 1
        let result = stats.observe(5.0_f64.exp()).unwrap();
        assert_relative_eq!(result.mean, 2.0, epsilon = 1e-12);
        assert_relative_eq!(result.std_dev, 1.0, epsilon = 1e-12);
        assert_relative_eq!(result.z_score, 3.0, epsilon = 1e-9);
        assert_eq!(result.samples, 3);
    }

    #[test]
    fn test_window_rolls() {
        let mut stats = LogVolumeStats::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            stats.update(v).unwrap();
        }
        assert_eq!(stats.len(), 3);
        assert!(stats.is_ready());
        let logs: Vec<f64> = stats.log_volumes().collect();
        assert_relative_eq!(logs[0], 2.0_f64.ln());
        assert_relative_eq!(logs[2], 4.0_f64.ln());
    }

    #[test]
    fn test_invalid_volume_leaves_window_unchanged() {
        let mut stats = LogVolumeStats::new(5);
        let mut control = LogVolumeStats::new(5);
        for v in [10.0, 20.0, 15.0] {
            stats.update(v).unwrap();
            control.update(v).unwrap();
        }

        assert!(matches!(stats.update(-5.0), Err(BarError::NonPositiveVolume(_))));
        assert!(stats.update(0.0).is_err());
        assert!(stats.update(f64::NAN).is_err());
        assert_eq!(stats.len(), 3);

        assert_eq!(stats.update(40.0).unwrap(), control.update(40.0).unwrap());
    }

    #[test]
    fn test_reset() {
        let mut stats = LogVolumeStats::new(3);
        stats.update(10.0).unwrap();
        stats.update(20.0).unwrap();
        stats.reset();
        assert!(stats.is_empty());
        assert!(!stats.is_ready());
    }
}
