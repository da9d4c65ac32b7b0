//! Trend Divergence
//!
//! Two trends diverge when they point in opposite directions. A flat reading
//! means "undetermined", not a direction, so it never counts as divergence.

pub use crate::domain::signal::DivergencePairing;

use super::trend::{TrendDirection, TrendState};

/// Result of comparing the two trend readings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Divergence {
    pub divergent: bool,
    pub pairing: DivergencePairing,
}

impl Divergence {
    pub const NONE: Divergence = Divergence {
        divergent: false,
        pairing: DivergencePairing::None,
    };

    /// Compare long- and short-term readings
    pub fn classify(long: &TrendState, short: &TrendState) -> Self {
        let pairing = match (long.direction, short.direction) {
            (TrendDirection::Up, TrendDirection::Down) => DivergencePairing::ShortDownLongUp,
            (TrendDirection::Down, TrendDirection::Up) => DivergencePairing::ShortUpLongDown,
            _ => return Self::NONE,
        };
        Self { divergent: true, pairing }
    }
}
