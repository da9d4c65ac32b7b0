//! Long-Term Trend
//!
//! Smooths price with an EMA (α = 2 / (period + 1), seeded with the first
//! price) and fits an ordinary-least-squares line of EMA value against bar
//! index over the trailing regression window.
//!
//! magnitude = slope / mean(EMA window) * 1000
//!
//! i.e. per-mille of the EMA level per bar, comparable across instruments.
//! EMA values only enter the regression window once the EMA has seen a full
//! period of prices; the slope is only fitted once that window is full.

use std::collections::VecDeque;

use super::{TrendEstimator, TrendState};

/// Scale applied to the level-normalized slope
const PER_MILLE: f64 = 1000.0;

/// Recursive exponential moving average
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: f64,
    value: Option<f64>,
    count: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            alpha: 2.0 / (period as f64 + 1.0),
            value: None,
            count: 0,
        }
    }

    pub fn update(&mut self, price: f64) -> f64 {
        let next = match self.value {
            Some(prev) => self.alpha * price + (1.0 - self.alpha) * prev,
            None => price,
        };
        self.value = Some(next);
        self.count += 1;
        next
    }

    /// Current EMA value, if any price has been seen
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// True once a full period of prices has been seen
    pub fn is_initialized(&self) -> bool {
        self.count >= self.period
    }

    pub fn reset(&mut self) {
        self.value = None;
        self.count = 0;
    }
}

/// Least-squares line through evenly spaced samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Mean of the fitted values
    pub mean: f64,
}

impl LinearFit {
    /// Fit y against x = 0, 1, .., n-1. Returns None for fewer than two samples.
    ///
    /// Sums are accumulated in index order so results are reproducible.
    pub fn fit<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
        I::IntoIter: Clone,
    {
        let values = values.into_iter();
        let (n, sum_y) = values.clone().fold((0usize, 0.0), |(n, s), y| (n + 1, s + y));
        if n < 2 {
            return None;
        }

        let n_f = n as f64;
        let mean_x = (n_f - 1.0) / 2.0;
        let mean_y = sum_y / n_f;

        let (sxy, sxx) = values
            .enumerate()
            .fold((0.0, 0.0), |(sxy, sxx), (i, y)| {
                let dx = i as f64 - mean_x;
                (sxy + dx * (y - mean_y), sxx + dx * dx)
            });

        let slope = sxy / sxx;
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
            mean: mean_y,
        })
    }
}

/// EMA-plus-regression long-horizon trend estimator
#[derive(Debug, Clone)]
pub struct LongTermTrend {
    ema: Ema,
    regression_window: usize,
    ema_values: VecDeque<f64>,
    deadband: f64,
    state: TrendState,
}

impl LongTermTrend {
    /// Create a new estimator
    ///
    /// # Arguments
    /// * `ema_period` - EMA smoothing period in bars
    /// * `regression_window` - number of EMA values the slope is fitted over
    /// * `deadband` - normalized slope inside which the trend is flat
    pub fn new(ema_period: usize, regression_window: usize, deadband: f64) -> Self {
        Self {
            ema: Ema::new(ema_period),
            regression_window,
            ema_values: VecDeque::new(),
            deadband,
            state: TrendState::WARMUP,
        }
    }

    fn compute(&self) -> TrendState {
        if self.ema_values.len() < self.regression_window {
            return TrendState::WARMUP;
        }

        let fit = match LinearFit::fit(self.ema_values.iter().copied()) {
            Some(fit) => fit,
            None => return TrendState::WARMUP,
        };

        let magnitude = if fit.mean != 0.0 {
            fit.slope / fit.mean * PER_MILLE
        } else {
            0.0
        };

        TrendState::from_magnitude(magnitude, self.deadband)
    }

    /// Latest EMA value
    pub fn ema(&self) -> Option<f64> {
        self.ema.value()
    }
}

impl TrendEstimator for LongTermTrend {
    fn update(&mut self, price: f64) -> TrendState {
        let ema = self.ema.update(price);

        if self.ema.is_initialized() {
            if self.ema_values.len() == self.regression_window {
                self.ema_values.pop_front();
            }
            self.ema_values.push_back(ema);
        }

        self.state = self.compute();
        self.state
    }

    fn state(&self) -> TrendState {
        self.state
    }

    fn is_ready(&self) -> bool {
        self.ema_values.len() >= self.regression_window
    }

    fn reset(&mut self) {
        self.ema.reset();
        self.ema_values.clear();
        self.state = TrendState::WARMUP;
    }
}
