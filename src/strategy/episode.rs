//! Divergence Episode Tracker
//!
//! Three-phase state machine driven once per bar by the divergence flag and
//! the volume regime:
//!
//! | phase         | divergent | volume      | next          |
//! |---------------|-----------|-------------|---------------|
//! | any           | no        | any         | Idle          |
//! | Idle/Deviating| yes       | big jump    | TrendChanged  |
//! | Idle/Deviating| yes       | moderate/low| Deviating     |
//! | TrendChanged  | yes       | any         | TrendChanged  |
//!
//! - Deviating emits the long-term direction (expect reversion)
//! - TrendChanged emits the short-term direction (follow the new trend)
//! - TrendChanged is sticky: only re-alignment of the trends ends it

use tracing::debug;

use crate::domain::signal::{EpisodePhase, Signal};

use super::divergence::{Divergence, DivergencePairing};
use super::volume_regime::VolumeRegime;

/// Episode memory carried across bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EpisodeState {
    pub phase: EpisodePhase,
    /// Bar on which the current episode left idle
    pub entry_bar_index: Option<u64>,
    /// Pairing observed when the current episode began
    pub entry_pairing: DivergencePairing,
}

/// Episode state machine and signal generator
#[derive(Debug, Clone, Default)]
pub struct EpisodeTracker {
    state: EpisodeState,
    episodes_started: u64,
}

impl EpisodeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one bar and return the signal for it
    pub fn step(&mut self, bar_index: u64, divergence: Divergence, regime: VolumeRegime) -> Signal {
        let previous = self.state.phase;
        let next = Self::next_phase(previous, divergence.divergent, regime);

        match (previous, next) {
            (_, EpisodePhase::Idle) => {
                self.state = EpisodeState::default();
            }
            (EpisodePhase::Idle, _) => {
                self.episodes_started += 1;
                self.state = EpisodeState {
                    phase: next,
                    entry_bar_index: Some(bar_index),
                    entry_pairing: divergence.pairing,
                };
            }
            _ => {
                self.state.phase = next;
            }
        }

        if previous != next {
            debug!(
                bar_index,
                from = %previous,
                to = %next,
                pairing = %divergence.pairing,
                regime = %regime,
                "Episode phase transition"
            );
        }

        Self::signal_for(next, divergence.pairing)
    }

    /// Transition table
    pub fn next_phase(
        current: EpisodePhase,
        divergent: bool,
        regime: VolumeRegime,
    ) -> EpisodePhase {
        if !divergent {
            return EpisodePhase::Idle;
        }
        match (current, regime) {
            (EpisodePhase::TrendChanged, _) => EpisodePhase::TrendChanged,
            (_, VolumeRegime::BigJump) => EpisodePhase::TrendChanged,
            (_, VolumeRegime::Moderate | VolumeRegime::Low) => EpisodePhase::Deviating,
        }
    }

    /// Signal emitted in a phase for the bar's divergence pairing
    pub fn signal_for(phase: EpisodePhase, pairing: DivergencePairing) -> Signal {
        match phase {
            EpisodePhase::Idle => Signal::Neutral,
            EpisodePhase::Deviating => Signal::from_direction(pairing.long_direction()),
            EpisodePhase::TrendChanged => Signal::from_direction(pairing.short_direction()),
        }
    }

    pub fn state(&self) -> EpisodeState {
        self.state
    }

    pub fn phase(&self) -> EpisodePhase {
        self.state.phase
    }

    /// Number of episodes opened since construction or reset
    pub fn episodes_started(&self) -> u64 {
        self.episodes_started
    }

    pub fn reset(&mut self) {
        self.state = EpisodeState::default();
        self.episodes_started = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UP_DOWN: Divergence = Divergence {
        divergent: true,
        pairing: DivergencePairing::ShortDownLongUp,
    };
    const DOWN_UP: Divergence = Divergence {
        divergent: true,
        pairing: DivergencePairing::ShortUpLongDown,
    };

    #[test]
    fn test_idle_stays_idle_without_divergence() {
        let mut tracker = EpisodeTracker::new();
        for regime in [VolumeRegime::BigJump, VolumeRegime::Moderate, VolumeRegime::Low] {
            assert_eq!(tracker.step(0, Divergence::NONE, regime), Signal::Neutral);
            assert_eq!(tracker.phase(), EpisodePhase::Idle);
        }
        assert_eq!(tracker.episodes_started(), 0);
    }

    #[test]
    fn test_idle_to_trend_changed_on_big_jump() {
        let mut tracker = EpisodeTracker::new();
        assert_eq!(tracker.step(7, UP_DOWN, VolumeRegime::BigJump), Signal::Short);
        assert_eq!(tracker.phase(), EpisodePhase::TrendChanged);
        assert_eq!(tracker.state().entry_bar_index, Some(7));
        assert_eq!(tracker.state().entry_pairing, DivergencePairing::ShortDownLongUp);

        let mut tracker = EpisodeTracker::new();
        assert_eq!(tracker.step(0, DOWN_UP, VolumeRegime::BigJump), Signal::Long);
    }

    #[test]
    fn test_idle_to_deviating_reverts_to_long_term() {
        let mut tracker = EpisodeTracker::new();
        assert_eq!(tracker.step(3, UP_DOWN, VolumeRegime::Moderate), Signal::Long);
        assert_eq!(tracker.phase(), EpisodePhase::Deviating);

        let mut tracker = EpisodeTracker::new();
        assert_eq!(tracker.step(3, DOWN_UP, VolumeRegime::Low), Signal::Short);
        assert_eq!(tracker.phase(), EpisodePhase::Deviating);
    }

    #[test]
    fn test_deviating_promoted_by_big_jump() {
        let mut tracker = EpisodeTracker::new();
        tracker.step(10, UP_DOWN, VolumeRegime::Low);
        assert_eq!(tracker.step(11, UP_DOWN, VolumeRegime::Moderate), Signal::Long);
        assert_eq!(tracker.phase(), EpisodePhase::Deviating);

        assert_eq!(tracker.step(12, UP_DOWN, VolumeRegime::BigJump), Signal::Short);
        assert_eq!(tracker.phase(), EpisodePhase::TrendChanged);
        // Same episode: entry bar kept
        assert_eq!(tracker.state().entry_bar_index, Some(10));
        assert_eq!(tracker.episodes_started(), 1);
    }

    #[test]
    fn test_deviating_resolves_on_realignment() {
        let mut tracker = EpisodeTracker::new();
        tracker.step(0, UP_DOWN, VolumeRegime::Moderate);
        assert_eq!(tracker.step(1, Divergence::NONE, VolumeRegime::BigJump), Signal::Neutral);
        assert_eq!(tracker.state(), EpisodeState::default());
    }

    #[test]
    fn test_trend_changed_is_sticky() {
        let mut tracker = EpisodeTracker::new();
        tracker.step(0, DOWN_UP, VolumeRegime::BigJump);
        for (i, regime) in [VolumeRegime::Low, VolumeRegime::Moderate, VolumeRegime::Low]
            .into_iter()
            .enumerate()
        {
            assert_eq!(tracker.step(i as u64 + 1, DOWN_UP, regime), Signal::Long);
            assert_eq!(tracker.phase(), EpisodePhase::TrendChanged);
        }
        assert_eq!(tracker.step(4, Divergence::NONE, VolumeRegime::Low), Signal::Neutral);
        assert_eq!(tracker.phase(), EpisodePhase::Idle);
    }

    #[test]
    fn test_pairing_flip_keeps_phase_and_follows_current_pairing() {
        let mut tracker = EpisodeTracker::new();
        tracker.step(0, UP_DOWN, VolumeRegime::Low);
        assert_eq!(tracker.step(1, DOWN_UP, VolumeRegime::Low), Signal::Short);
        assert_eq!(tracker.phase(), EpisodePhase::Deviating);
        assert_eq!(tracker.state().entry_pairing, DivergencePairing::ShortDownLongUp);
    }

    #[test]
    fn test_transition_table_is_total() {
        let phases = [EpisodePhase::Idle, EpisodePhase::Deviating, EpisodePhase::TrendChanged];
        let regimes = [VolumeRegime::BigJump, VolumeRegime::Moderate, VolumeRegime::Low];
        for phase in phases {
            for regime in regimes {
                assert_eq!(EpisodeTracker::next_phase(phase, false, regime), EpisodePhase::Idle);
                let next = EpisodeTracker::next_phase(phase, true, regime);
                let confirmed =
                    phase == EpisodePhase::TrendChanged || regime == VolumeRegime::BigJump;
                let expected = if confirmed {
                    EpisodePhase::TrendChanged
                } else {
                    EpisodePhase::Deviating
                };
                assert_eq!(next, expected);
            }
        }
    }

    #[test]
    fn test_episode_count_and_reset() {
        let mut tracker = EpisodeTracker::new();
        tracker.step(0, UP_DOWN, VolumeRegime::Low);
        tracker.step(1, Divergence::NONE, VolumeRegime::Low);
        tracker.step(2, DOWN_UP, VolumeRegime::BigJump);
        assert_eq!(tracker.episodes_started(), 2);

        tracker.reset();
        assert_eq!(tracker.episodes_started(), 0);
        assert_eq!(tracker.phase(), EpisodePhase::Idle);
    }
}
