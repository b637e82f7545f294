use std::time::Duration;

use rand::Rng;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("delay range minimum {min:?} exceeds maximum {max:?}")]
pub struct DelayRangeError {
    pub min: Duration,
    pub max: Duration,
}

/// Closed interval the inter-probe pause is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    pub const ZERO: DelayRange = DelayRange {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    pub fn new(min: Duration, max: Duration) -> Result<Self, DelayRangeError> {
        if min > max {
            return Err(DelayRangeError { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn from_secs_f64(min: f64, max: f64) -> Result<Self, DelayRangeError> {
        Self::new(secs(min), secs(max))
    }

    pub fn fixed(delay: Duration) -> Self {
        Self {
            min: delay,
            max: delay,
        }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn contains(&self, delay: Duration) -> bool {
        delay >= self.min && delay <= self.max
    }

    /// Draws a pause uniformly from `[min, max]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(3),
            max: Duration::from_secs(8),
        }
    }
}

// Negative, NaN and overflowing inputs clamp to zero.
fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}
