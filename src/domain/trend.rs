//! Trend Readings
//!
//! Direction and magnitude of a trend on one horizon, and the deadband rule
//! that turns a magnitude into a direction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a trend reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    /// Undetermined: warm-up, or magnitude inside the deadband
    #[default]
    Flat,
}

impl TrendDirection {
    /// Classify a magnitude against a symmetric deadband.
    ///
    /// A magnitude exactly on the band edge is flat.
    pub fn from_magnitude(magnitude: f64, deadband: f64) -> Self {
        if magnitude > deadband {
            Self::Up
        } else if magnitude < -deadband {
            Self::Down
        } else {
            Self::Flat
        }
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, Self::Flat)
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "Up"),
            Self::Down => write!(f, "Down"),
            Self::Flat => write!(f, "Flat"),
        }
    }
}

/// Trend reading for one horizon. Replaced as a whole on every bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrendState {
    pub direction: TrendDirection,
    pub magnitude: f64,
}

impl TrendState {
    /// Reading used while history is insufficient
    pub const WARMUP: TrendState = TrendState {
        direction: TrendDirection::Flat,
        magnitude: 0.0,
    };

    pub fn from_magnitude(magnitude: f64, deadband: f64) -> Self {
        Self {
            direction: TrendDirection::from_magnitude(magnitude, deadband),
            magnitude,
        }
    }
}
