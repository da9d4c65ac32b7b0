use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::trend::{TrendDirection, TrendState};

/// Directional call emitted once per bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Long,
    Short,
    Neutral,
}

impl Signal {
    /// Signal that trades along a trend direction. Flat maps to neutral.
    pub fn from_direction(direction: TrendDirection) -> Self {
        match direction {
            TrendDirection::Up => Signal::Long,
            TrendDirection::Down => Signal::Short,
            TrendDirection::Flat => Signal::Neutral,
        }
    }

    /// +1 for long, -1 for short, 0 for neutral
    pub fn as_f64(&self) -> f64 {
        match self {
            Signal::Long => 1.0,
            Signal::Short => -1.0,
            Signal::Neutral => 0.0,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Long => write!(f, "Long"),
            Signal::Short => write!(f, "Short"),
            Signal::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Phase of the divergence episode tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodePhase {
    /// Trends aligned, or at least one of them undetermined
    #[default]
    Idle,
    /// Divergence on ordinary volume: expect reversion to the long-term trend
    Deviating,
    /// Divergence confirmed by a volume jump: follow the short-term trend
    TrendChanged,
}

impl fmt::Display for EpisodePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodePhase::Idle => write!(f, "Idle"),
            EpisodePhase::Deviating => write!(f, "Deviating"),
            EpisodePhase::TrendChanged => write!(f, "TrendChanged"),
        }
    }
}

/// How the two horizons disagree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergencePairing {
    /// Pullback inside an uptrend
    ShortDownLongUp,
    /// Bounce inside a downtrend
    ShortUpLongDown,
    #[default]
    None,
}

impl DivergencePairing {
    /// Direction of the short-term leg
    pub fn short_direction(&self) -> TrendDirection {
        match self {
            Self::ShortDownLongUp => TrendDirection::Down,
            Self::ShortUpLongDown => TrendDirection::Up,
            Self::None => TrendDirection::Flat,
        }
    }

    /// Direction of the long-term leg
    pub fn long_direction(&self) -> TrendDirection {
        match self {
            Self::ShortDownLongUp => TrendDirection::Up,
            Self::ShortUpLongDown => TrendDirection::Down,
            Self::None => TrendDirection::Flat,
        }
    }
}

impl fmt::Display for DivergencePairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortDownLongUp => write!(f, "ShortDown/LongUp"),
            Self::ShortUpLongDown => write!(f, "ShortUp/LongDown"),
            Self::None => write!(f, "None"),
        }
    }
}

/// Abnormality of the current bar's volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeRegime {
    BigJump,
    Moderate,
    Low,
}

impl VolumeRegime {
    pub fn is_big_jump(&self) -> bool {
        matches!(self, Self::BigJump)
    }
}

impl fmt::Display for VolumeRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BigJump => write!(f, "BigJump"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// Per-bar indicator output. Never mutated after emission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalOutput {
    pub timestamp: DateTime<Utc>,
    /// Zero-based index of the accepted bar within the stream
    pub bar_index: u64,
    pub long_trend: TrendState,
    pub short_trend: TrendState,
    pub divergence: bool,
    pub pairing: DivergencePairing,
    /// Log-volume z-score against the trailing window
    pub volume_z: f64,
    pub volume_regime: VolumeRegime,
    pub episode_phase: EpisodePhase,
    pub signal: Signal,
    /// Signal scaled by the configured sensitivity
    pub value: f64,
}

impl SignalOutput {
    /// True while a divergence episode is open
    pub fn in_episode(&self) -> bool {
        self.episode_phase != EpisodePhase::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_from_direction() {
        assert_eq!(Signal::from_direction(TrendDirection::Up), Signal::Long);
        assert_eq!(Signal::from_direction(TrendDirection::Down), Signal::Short);
        assert_eq!(Signal::from_direction(TrendDirection::Flat), Signal::Neutral);
    }

    #[test]
    fn test_signal_as_f64() {
        assert_eq!(Signal::Long.as_f64(), 1.0);
        assert_eq!(Signal::Short.as_f64(), -1.0);
        assert_eq!(Signal::Neutral.as_f64(), 0.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Signal::Short.to_string(), "Short");
        assert_eq!(EpisodePhase::TrendChanged.to_string(), "TrendChanged");
        assert_eq!(EpisodePhase::default(), EpisodePhase::Idle);
    }

    #[test]
    fn test_pairing_legs() {
        assert_eq!(DivergencePairing::ShortDownLongUp.short_direction(), TrendDirection::Down);
        assert_eq!(DivergencePairing::ShortDownLongUp.long_direction(), TrendDirection::Up);
        assert_eq!(DivergencePairing::ShortUpLongDown.short_direction(), TrendDirection::Up);
        assert_eq!(DivergencePairing::ShortUpLongDown.long_direction(), TrendDirection::Down);
        assert_eq!(DivergencePairing::None.long_direction(), TrendDirection::Flat);
    }

    #[test]
    fn test_regime_display() {
        assert_eq!(VolumeRegime::BigJump.to_string(), "BigJump");
        assert!(VolumeRegime::BigJump.is_big_jump());
        assert!(!VolumeRegime::Moderate.is_big_jump());
    }

    #[test]
    fn test_in_episode() {
        let mut output = SignalOutput {
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            bar_index: 0,
            long_trend: TrendState::WARMUP,
            short_trend: TrendState::WARMUP,
            divergence: false,
            pairing: DivergencePairing::None,
            volume_z: 0.0,
            volume_regime: VolumeRegime::Low,
            episode_phase: EpisodePhase::Idle,
            signal: Signal::Neutral,
            value: 0.0,
        };
        assert!(!output.in_episode());
        output.episode_phase = EpisodePhase::Deviating;
        assert!(output.in_episode());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Signal::Long).unwrap(), "\"long\"");
        assert_eq!(
            serde_json::to_string(&EpisodePhase::TrendChanged).unwrap(),
            "\"trend_changed\""
        );
    }
}
