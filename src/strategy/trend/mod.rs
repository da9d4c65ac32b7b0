//! Trend Estimation
//!
//! Two independent estimators read the same price stream on different
//! horizons and reduce it to a [`TrendState`]:
//!
//! - **Long term**: EMA of price, OLS slope over the trailing EMA values,
//!   normalized by the EMA level (per-mille per bar)
//! - **Short term**: endpoint momentum over a short window (percent)
//!
//! Each estimator owns its history. Neither reads the other's state.

pub mod long_term;
pub mod short_term;

pub use long_term::LongTermTrend;
pub use short_term::ShortTermTrend;

pub use crate::domain::trend::{TrendDirection, TrendState};

/// Streaming trend estimator over a price series
pub trait TrendEstimator {
    /// Add a price and return the fresh reading
    fn update(&mut self, price: f64) -> TrendState;

    /// Latest reading without consuming a price
    fn state(&self) -> TrendState;

    /// Check if enough history exists for a non-warm-up reading
    fn is_ready(&self) -> bool;

    /// Clear all history
    fn reset(&mut self);
}
