//! Trend Divergence Indicator
//!
//! Wires the per-bar pipeline together:
//!
//! ```text
//! price  -> long-term trend  \
//!                             > divergence    \
//! price  -> short-term trend /                 > episode tracker -> SignalOutput
//! volume -> log-volume z ----> volume regime  /
//! ```
//!
//! A bar is fully validated before any component sees it, so a rejected bar
//! leaves every buffer and the episode state exactly as they were.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::bar::{Bar, BarError};
use crate::domain::signal::SignalOutput;
use crate::ports::indicator::TrendIndicator;

use super::divergence::Divergence;
use super::episode::{EpisodeState, EpisodeTracker};
use super::params::{ConfigError, IndicatorConfig};
use super::trend::{LongTermTrend, ShortTermTrend, TrendEstimator};
use super::volume_regime::VolumeRegimeClassifier;
use super::volume_stats::LogVolumeStats;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("Invalid bar: {0}")]
    InvalidInput(#[from] BarError),
}

/// Streaming trend divergence / volume confirmation indicator for one instrument
#[derive(Debug, Clone)]
pub struct TrendDivergenceIndicator {
    config: IndicatorConfig,
    volume: LogVolumeStats,
    long_trend: LongTermTrend,
    short_trend: ShortTermTrend,
    regimes: VolumeRegimeClassifier,
    episodes: EpisodeTracker,
    last_timestamp: Option<DateTime<Utc>>,
    bars_processed: u64,
    current: Option<SignalOutput>,
}

impl TrendDivergenceIndicator {
    /// Create a new indicator; the configuration is validated here
    pub fn new(config: IndicatorConfig) -> Result<Self, IndicatorError> {
        config.validate()?;
        let regimes = VolumeRegimeClassifier::from_config(&config)?;

        Ok(Self {
            volume: LogVolumeStats::new(config.volume_lookback_window),
            long_trend: LongTermTrend::new(
                config.long_term_ema_period,
                config.long_term_regression_window,
                config.deadband_long,
            ),
            short_trend: ShortTermTrend::new(config.short_term_window, config.deadband_short),
            regimes,
            episodes: EpisodeTracker::new(),
            last_timestamp: None,
            bars_processed: 0,
            current: None,
            config,
        })
    }

    /// Feed one bar and return its output
    pub fn update(&mut self, bar: &Bar) -> Result<SignalOutput, IndicatorError> {
        if let Err(e) = bar.validate().and_then(|_| bar.check_follows(self.last_timestamp)) {
            warn!(
                timestamp = %bar.timestamp,
                price = bar.price,
                volume = bar.volume,
                "Rejected bar: {}",
                e
            );
            return Err(e.into());
        }

        let volume = self.volume.observe(bar.volume)?;
        let long_trend = self.long_trend.update(bar.price);
        let short_trend = self.short_trend.update(bar.price);

        let divergence = Divergence::classify(&long_trend, &short_trend);
        let volume_regime = self.regimes.classify(volume.z_score);

        let bar_index = self.bars_processed;
        let signal = self.episodes.step(bar_index, divergence, volume_regime);

        let output = SignalOutput {
            timestamp: bar.timestamp,
            bar_index,
            long_trend,
            short_trend,
            divergence: divergence.divergent,
            pairing: divergence.pairing,
            volume_z: volume.z_score,
            volume_regime,
            episode_phase: self.episodes.phase(),
            signal,
            value: signal.as_f64() * self.config.sensitivity,
        };

        debug!(
            bar_index,
            price = bar.price,
            long = long_trend.magnitude,
            short = short_trend.magnitude,
            z = volume.z_score,
            phase = %output.episode_phase,
            signal = %signal,
            "Bar processed"
        );

        self.bars_processed += 1;
        self.last_timestamp = Some(bar.timestamp);
        self.current = Some(output);
        Ok(output)
    }

    /// Output for the last accepted bar
    pub fn current(&self) -> Option<&SignalOutput> {
        self.current.as_ref()
    }

    /// Check if both trend estimators have left warm-up
    pub fn is_ready(&self) -> bool {
        self.long_trend.is_ready() && self.short_trend.is_ready()
    }

    /// Number of accepted bars
    pub fn bars_processed(&self) -> u64 {
        self.bars_processed
    }

    pub fn episode_state(&self) -> EpisodeState {
        self.episodes.state()
    }

    /// Episodes opened since construction or reset
    pub fn episodes_started(&self) -> u64 {
        self.episodes.episodes_started()
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Clear all history and return to idle; configuration is kept
    pub fn reset(&mut self) {
        self.volume.reset();
        self.long_trend.reset();
        self.short_trend.reset();
        self.episodes.reset();
        self.last_timestamp = None;
        self.bars_processed = 0;
        self.current = None;
    }
}

impl fmt::Display for TrendDivergenceIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.config, f)
    }
}

impl TrendIndicator for TrendDivergenceIndicator {
    fn update(&mut self, bar: &Bar) -> Result<SignalOutput, IndicatorError> {
        TrendDivergenceIndicator::update(self, bar)
    }

    fn current(&self) -> Option<&SignalOutput> {
        TrendDivergenceIndicator::current(self)
    }

    fn is_ready(&self) -> bool {
        TrendDivergenceIndicator::is_ready(self)
    }

    fn name(&self) -> &'static str {
        "TrendDivergence"
    }

    fn reset(&mut self) {
        TrendDivergenceIndicator::reset(self)
    }
}
