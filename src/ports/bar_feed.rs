use std::collections::VecDeque;
use thiserror::Error;

use crate::domain::bar::Bar;

/// Bar source error type
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to read bars: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed bar on line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Sequential source of bars for one instrument
pub trait BarFeed {
    /// Next bar in stream order, or None when exhausted
    fn next_bar(&mut self) -> Option<Result<Bar, FeedError>>;
}

/// In-memory feed over a fixed bar sequence
#[derive(Debug, Clone, Default)]
pub struct VecBarFeed {
    bars: VecDeque<Bar>,
}

impl VecBarFeed {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars: bars.into() }
    }

    /// Bars not yet consumed
    pub fn remaining(&self) -> usize {
        self.bars.len()
    }
}

impl From<Vec<Bar>> for VecBarFeed {
    fn from(bars: Vec<Bar>) -> Self {
        Self::new(bars)
    }
}

impl BarFeed for VecBarFeed {
    fn next_bar(&mut self) -> Option<Result<Bar, FeedError>> {
        self.bars.pop_front().map(Ok)
    }
}
