use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One closed bar of the input stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("Invalid price: {0} (must be finite and > 0)")]
    NonPositivePrice(f64),
    #[error("Invalid volume: {0} (must be finite and > 0)")]
    NonPositiveVolume(f64),
    #[error("Timestamp {received} is not after previous bar {previous}")]
    NonIncreasingTimestamp {
        previous: DateTime<Utc>,
        received: DateTime<Utc>,
    },
}

impl Bar {
    pub fn new(timestamp: DateTime<Utc>, price: f64, volume: f64) -> Result<Self, BarError> {
        let bar = Self { timestamp, price, volume };
        bar.validate()?;
        Ok(bar)
    }

    /// Check the price/volume preconditions. Ordering is checked by the consumer.
    pub fn validate(&self) -> Result<(), BarError> {
        check_price(self.price)?;
        check_volume(self.volume)
    }

    /// Check that this bar may follow `previous` in the stream
    pub fn check_follows(&self, previous: Option<DateTime<Utc>>) -> Result<(), BarError> {
        match previous {
            Some(previous) if self.timestamp <= previous => Err(BarError::NonIncreasingTimestamp {
                previous,
                received: self.timestamp,
            }),
            _ => Ok(()),
        }
    }
}

pub(crate) fn check_price(price: f64) -> Result<(), BarError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(BarError::NonPositivePrice(price))
    }
}

pub(crate) fn check_volume(volume: f64) -> Result<(), BarError> {
    if volume.is_finite() && volume > 0.0 {
        Ok(())
    } else {
        Err(BarError::NonPositiveVolume(volume))
    }
}
