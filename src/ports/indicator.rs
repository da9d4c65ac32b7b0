use crate::domain::bar::Bar;
use crate::domain::signal::SignalOutput;
use crate::strategy::indicator::IndicatorError;

/// Per-instrument streaming indicator consumed by the breakout strategy
///
/// One instance per instrument; calls on an instance must be serialized.
/// The consumer reads `signal`, `episode_phase` and the two trend directions
/// of each output and never inspects internal buffers.
pub trait TrendIndicator: Send {
    /// Feed the next bar and get its output. A rejected bar leaves the state untouched.
    fn update(&mut self, bar: &Bar) -> Result<SignalOutput, IndicatorError>;

    /// Output for the last accepted bar
    fn current(&self) -> Option<&SignalOutput>;

    /// Check if both trend horizons have left warm-up
    fn is_ready(&self) -> bool;

    /// Get indicator name for logging/display
    fn name(&self) -> &'static str;

    /// Return to the freshly constructed state
    fn reset(&mut self);
}
