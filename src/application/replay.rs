//! Replay Runner
//!
//! Drives one instrument's bar feed through one indicator instance, the way
//! a live session would: bars strictly in order, rejected bars logged and
//! skipped, one output per accepted bar.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::signal::{EpisodePhase, Signal, SignalOutput};
use crate::ports::bar_feed::{BarFeed, FeedError};
use crate::ports::indicator::TrendIndicator;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Bar feed error: {0}")]
    Feed(#[from] FeedError),
}

/// Counts over one replay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub accepted: u64,
    pub rejected: u64,
    pub idle_bars: u64,
    pub deviating_bars: u64,
    pub trend_changed_bars: u64,
    pub long_signals: u64,
    pub short_signals: u64,
    pub neutral_signals: u64,
    /// Transitions out of idle
    pub episodes: u64,
}

impl ReplaySummary {
    fn record(&mut self, output: &SignalOutput, previous: EpisodePhase) {
        self.accepted += 1;
        match output.episode_phase {
            EpisodePhase::Idle => self.idle_bars += 1,
            EpisodePhase::Deviating => self.deviating_bars += 1,
            EpisodePhase::TrendChanged => self.trend_changed_bars += 1,
        }
        match output.signal {
            Signal::Long => self.long_signals += 1,
            Signal::Short => self.short_signals += 1,
            Signal::Neutral => self.neutral_signals += 1,
        }
        if previous == EpisodePhase::Idle && output.in_episode() {
            self.episodes += 1;
        }
    }
}

/// Outputs and summary of a replay
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub outputs: Vec<SignalOutput>,
    pub summary: ReplaySummary,
}

/// Feeds bars through an owned indicator
pub struct ReplayRunner<I: TrendIndicator> {
    indicator: I,
}

impl<I: TrendIndicator> ReplayRunner<I> {
    pub fn new(indicator: I) -> Self {
        Self { indicator }
    }

    /// Consume the feed to exhaustion.
    ///
    /// Invalid bars are counted and skipped; feed errors abort the replay.
    pub fn run<F: BarFeed + ?Sized>(&mut self, feed: &mut F) -> Result<ReplayReport, ReplayError> {
        info!(indicator = self.indicator.name(), "Starting replay");

        let mut outputs = Vec::new();
        let mut summary = ReplaySummary::default();
        let mut previous = self
            .indicator
            .current()
            .map(|o| o.episode_phase)
            .unwrap_or_default();

        while let Some(bar) = feed.next_bar() {
            let bar = bar?;
            match self.indicator.update(&bar) {
                Ok(output) => {
                    summary.record(&output, previous);
                    previous = output.episode_phase;
                    outputs.push(output);
                }
                Err(e) => {
                    warn!(timestamp = %bar.timestamp, "Skipping bar: {}", e);
                    summary.rejected += 1;
                }
            }
        }

        info!(
            accepted = summary.accepted,
            rejected = summary.rejected,
            episodes = summary.episodes,
            "Replay finished"
        );
        Ok(ReplayReport { outputs, summary })
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::Bar;
    use crate::ports::bar_feed::VecBarFeed;
    use crate::strategy::{IndicatorConfig, TrendDivergenceIndicator};
    use chrono::{TimeZone, Utc};

    fn bar(i: i64, price: f64, volume: f64) -> Bar {
        Bar {
            timestamp: Utc.timestamp_opt(1_600_000_000 + i * 3600, 0).unwrap(),
            price,
            volume,
        }
    }

    fn runner() -> ReplayRunner<TrendDivergenceIndicator> {
        let config = IndicatorConfig::default()
            .with_long_term(4, 4)
            .with_short_term_window(2)
            .with_volume_lookback(8)
            .with_deadbands(0.0, 0.0);
        ReplayRunner::new(TrendDivergenceIndicator::new(config).unwrap())
    }

    #[test]
    fn test_replay_skips_rejected_bars() {
        let mut bars: Vec<Bar> = (0..10).map(|i| bar(i, 100.0 + i as f64, 1_000.0)).collect();
        bars.insert(5, bar(4, 104.0, 1_000.0)); // duplicate timestamp
        bars.push(bar(10, 110.0, -1.0));
        let mut feed = VecBarFeed::new(bars);

        let mut runner = runner();
        let report = runner.run(&mut feed).unwrap();

        assert_eq!(report.summary.accepted, 10);
        assert_eq!(report.summary.rejected, 2);
        assert_eq!(report.outputs.len(), 10);
        assert_eq!(runner.indicator().bars_processed(), 10);
    }

    #[test]
    fn test_summary_counts_are_consistent() {
        let prices = [
            100.0, 101.0, 102.0, 103.0, 104.0, 105.0, 106.0, 107.0, 108.0, 109.0, 110.0,
            108.0, 106.0, 104.0, 106.0, 108.0, 110.0, 112.0,
        ];
        let bars: Vec<Bar> = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| bar(i as i64, p, 1_000.0 + (i % 4) as f64 * 50.0))
            .collect();
        let report = runner().run(&mut VecBarFeed::new(bars)).unwrap();

        let s = &report.summary;
        assert_eq!(s.accepted, prices.len() as u64);
        assert_eq!(s.idle_bars + s.deviating_bars + s.trend_changed_bars, s.accepted);
        assert_eq!(s.long_signals + s.short_signals + s.neutral_signals, s.accepted);
        // Pullback inside the uptrend opens an episode
        assert!(s.episodes >= 1);
    }
}
