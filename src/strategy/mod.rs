//! Strategy Layer - Trend divergence with volume confirmation
//!
//! Per-bar pipeline:
//! - Log-volume z-score against a trailing window
//! - Long-term trend: slope of an EMA fitted by least squares
//! - Short-term trend: momentum over a few bars
//! - Divergence between the two, classified by pairing
//! - Volume regime from the z-score (low, moderate, big jump)
//! - Episode tracking that turns the above into long/short/neutral

pub mod params;
pub mod volume_stats;
pub mod trend;
pub mod divergence;
pub mod volume_regime;
pub mod episode;
pub mod indicator;

pub use params::{ConfigError, IndicatorConfig};
pub use volume_stats::{LogVolumeStats, VolumeZScore};
pub use trend::{LongTermTrend, ShortTermTrend, TrendDirection, TrendEstimator, TrendState};
pub use divergence::{Divergence, DivergencePairing};
pub use volume_regime::{VolumeRegime, VolumeRegimeClassifier};
pub use episode::{EpisodeState, EpisodeTracker};
pub use indicator::{IndicatorError, TrendDivergenceIndicator};
