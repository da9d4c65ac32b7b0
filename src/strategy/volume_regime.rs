//! Volume Regime
//!
//! Buckets the log-volume z-score with two ordered thresholds:
//! - z >= big: big jump (confirms a trend change)
//! - moderate <= z < big: moderate
//! - z < moderate: low

pub use crate::domain::signal::VolumeRegime;

use super::params::{ConfigError, IndicatorConfig};

/// Stateless z-score to regime mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeRegimeClassifier {
    moderate: f64,
    big: f64,
}

impl VolumeRegimeClassifier {
    /// Create a classifier; requires finite `0 <= moderate < big`
    pub fn new(moderate: f64, big: f64) -> Result<Self, ConfigError> {
        if !moderate.is_finite() || !big.is_finite() || moderate < 0.0 || big <= moderate {
            return Err(ConfigError::InvalidThresholds { moderate, big });
        }
        Ok(Self { moderate, big })
    }

    pub fn from_config(config: &IndicatorConfig) -> Result<Self, ConfigError> {
        Self::new(config.moderate_threshold, config.big_threshold)
    }

    pub fn classify(&self, z: f64) -> VolumeRegime {
        if z >= self.big {
            VolumeRegime::BigJump
        } else if z >= self.moderate {
            VolumeRegime::Moderate
        } else {
            VolumeRegime::Low
        }
    }

    pub fn thresholds(&self) -> (f64, f64) {
        (self.moderate, self.big)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regime_boundaries() {
        let classifier = VolumeRegimeClassifier::new(1.0, 1.5).unwrap();
        assert_eq!(classifier.classify(3.0), VolumeRegime::BigJump);
        assert_eq!(classifier.classify(1.5), VolumeRegime::BigJump);
        assert_eq!(classifier.classify(1.4999), VolumeRegime::Moderate);
        assert_eq!(classifier.classify(1.0), VolumeRegime::Moderate);
        assert_eq!(classifier.classify(0.9999), VolumeRegime::Low);
        assert_eq!(classifier.classify(0.0), VolumeRegime::Low);
        assert_eq!(classifier.classify(-4.0), VolumeRegime::Low);
    }

    #[test]
    fn test_zero_moderate_threshold() {
        let classifier = VolumeRegimeClassifier::new(0.0, 2.0).unwrap();
        assert_eq!(classifier.classify(0.0), VolumeRegime::Moderate);
        assert_eq!(classifier.classify(-0.1), VolumeRegime::Low);
    }

    #[test]
    fn test_invalid_thresholds() {
        assert!(VolumeRegimeClassifier::new(1.5, 1.5).is_err());
        assert!(VolumeRegimeClassifier::new(2.0, 1.0).is_err());
        assert!(VolumeRegimeClassifier::new(-1.0, 1.0).is_err());
        assert!(matches!(
            VolumeRegimeClassifier::new(0.5, f64::INFINITY),
            Err(ConfigError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn test_from_default_config() {
        let classifier = VolumeRegimeClassifier::from_config(&IndicatorConfig::default()).unwrap();
        assert_eq!(classifier.thresholds(), (1.0, 1.5));
    }
}
