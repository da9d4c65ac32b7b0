//! Short-Term Trend
//!
//! Endpoint momentum over the last `window` bars, in percent:
//!
//! magnitude = (latest - price `window` bars ago) / price `window` bars ago * 100
//!
//! The buffer holds `window + 1` prices; until it is full the reading is flat.

use std::collections::VecDeque;

use super::{TrendEstimator, TrendState};

/// Momentum-based short-horizon trend estimator
#[derive(Debug, Clone)]
pub struct ShortTermTrend {
    window: usize,
    prices: VecDeque<f64>,
    deadband: f64,
    state: TrendState,
}

impl ShortTermTrend {
    pub fn new(window: usize, deadband: f64) -> Self {
        Self {
            window,
            prices: VecDeque::new(),
            deadband,
            state: TrendState::WARMUP,
        }
    }

    fn compute(&self) -> TrendState {
        if self.prices.len() <= self.window {
            return TrendState::WARMUP;
        }
        match (self.prices.front(), self.prices.back()) {
            (Some(&past), Some(&latest)) if past != 0.0 => {
                let momentum = (latest - past) / past * 100.0;
                TrendState::from_magnitude(momentum, self.deadband)
            }
            _ => TrendState::WARMUP,
        }
    }

    /// Prices in the momentum window, oldest first
    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.prices.iter().copied()
    }
}

impl TrendEstimator for ShortTermTrend {
    fn update(&mut self, price: f64) -> TrendState {
        if self.prices.len() > self.window {
            self.prices.pop_front();
        }
        self.prices.push_back(price);

        self.state = self.compute();
        self.state
    }

    fn state(&self) -> TrendState {
        self.state
    }

    fn is_ready(&self) -> bool {
        self.prices.len() > self.window
    }

    fn reset(&mut self) {
        self.prices.clear();
        self.state = TrendState::WARMUP;
    }
}
