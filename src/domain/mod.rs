//! Domain Layer - Core types for the trend divergence indicator
//!
//! Pure data with validation; no I/O and no dependency on the other layers.

pub mod bar;
pub mod signal;
pub mod trend;

pub use bar::{Bar, BarError};
pub use signal::{DivergencePairing, EpisodePhase, Signal, SignalOutput, VolumeRegime};
pub use trend::{TrendDirection, TrendState};
