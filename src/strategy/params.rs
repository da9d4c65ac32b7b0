//! Indicator Parameters
//!
//! Construction-time configuration for the trend divergence indicator.
//! Defaults follow an hourly bar stream: a 100-bar EMA feeding a 30-bar
//! slope fit, a 6-bar momentum window, and a 100-bar volume lookback.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::volume_regime::VolumeRegimeClassifier;

/// Largest accepted window of any kind (bars)
pub const MAX_WINDOW: usize = 1_000_000;

/// Main indicator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndicatorConfig {
    /// EMA smoothing period for the long-term trend (bars)
    pub long_term_ema_period: usize,
    /// Number of EMA values the long-term slope is fitted over
    pub long_term_regression_window: usize,
    /// Momentum window for the short-term trend (bars)
    pub short_term_window: usize,
    /// Trailing window for log-volume mean/std
    pub volume_lookback_window: usize,
    /// Z-score at or above which volume is moderate
    pub moderate_threshold: f64,
    /// Z-score at or above which volume is a big jump
    pub big_threshold: f64,
    /// Deadband on the normalized long-term slope (per-mille per bar)
    pub deadband_long: f64,
    /// Deadband on short-term momentum (percent)
    pub deadband_short: f64,
    /// Scale applied to the signal for the continuous `value` output
    pub sensitivity: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            long_term_ema_period: 100,
            long_term_regression_window: 30,
            short_term_window: 6,
            volume_lookback_window: 100,
            moderate_threshold: 1.0,
            big_threshold: 1.5,
            deadband_long: 0.01,
            deadband_short: 0.05,
            sensitivity: 3.5,
        }
    }
}

impl IndicatorConfig {
    pub fn with_long_term(mut self, ema_period: usize, regression_window: usize) -> Self {
        self.long_term_ema_period = ema_period;
        self.long_term_regression_window = regression_window;
        self
    }

    pub fn with_short_term_window(mut self, window: usize) -> Self {
        self.short_term_window = window;
        self
    }

    pub fn with_volume_lookback(mut self, window: usize) -> Self {
        self.volume_lookback_window = window;
        self
    }

    pub fn with_thresholds(mut self, moderate: f64, big: f64) -> Self {
        self.moderate_threshold = moderate;
        self.big_threshold = big;
        self
    }

    pub fn with_deadbands(mut self, long: f64, short: f64) -> Self {
        self.deadband_long = long;
        self.deadband_short = short;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Bars needed before both trend estimators leave warm-up
    pub fn warmup_bars(&self) -> usize {
        let long = self
            .long_term_ema_period
            .saturating_add(self.long_term_regression_window)
            .saturating_sub(1);
        let short = self.short_term_window.saturating_add(1);
        long.max(short)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_window("long_term_ema_period", self.long_term_ema_period, 1)?;
        check_window("long_term_regression_window", self.long_term_regression_window, 2)?;
        check_window("short_term_window", self.short_term_window, 1)?;
        check_window("volume_lookback_window", self.volume_lookback_window, 2)?;

        VolumeRegimeClassifier::new(self.moderate_threshold, self.big_threshold)?;

        check_deadband("deadband_long", self.deadband_long)?;
        check_deadband("deadband_short", self.deadband_short)?;

        if !self.sensitivity.is_finite() || self.sensitivity <= 0.0 {
            return Err(ConfigError::InvalidSensitivity(self.sensitivity));
        }
        Ok(())
    }
}

fn check_window(name: &'static str, value: usize, min: usize) -> Result<(), ConfigError> {
    if !(min..=MAX_WINDOW).contains(&value) {
        return Err(ConfigError::InvalidWindow { name, value, min, max: MAX_WINDOW });
    }
    Ok(())
}

fn check_deadband(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidDeadband { name, value });
    }
    Ok(())
}

impl fmt::Display for IndicatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TrendDivergence(long_term_ema_period={}, long_term_regression_window={}, \
             short_term_window={}, volume_lookback_window={}, moderate_threshold={}, \
             big_threshold={}, deadband_long={}, deadband_short={}, sensitivity={})",
            self.long_term_ema_period,
            self.long_term_regression_window,
            self.short_term_window,
            self.volume_lookback_window,
            self.moderate_threshold,
            self.big_threshold,
            self.deadband_long,
            self.deadband_short,
            self.sensitivity,
        )
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {name}: {value} (must be between {min} and {max})")]
    InvalidWindow {
        name: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
    #[error("Invalid volume thresholds: moderate={moderate}, big={big} (need 0 <= moderate < big)")]
    InvalidThresholds { moderate: f64, big: f64 },
    #[error("Invalid {name}: {value} (must be finite and >= 0)")]
    InvalidDeadband { name: &'static str, value: f64 },
    #[error("Invalid sensitivity: {0} (must be > 0)")]
    InvalidSensitivity(f64),
}
