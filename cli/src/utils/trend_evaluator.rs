use crate::models::{PriceSeries, Trend};
use crate::utils::moving_average::MovingAverage;
use thiserror::Error;

pub const DEFAULT_SHORT_WINDOW: usize = 50;
pub const DEFAULT_LONG_WINDOW: usize = 200;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrendError {
    #[error("need at least {required} points for the long moving average, got {available}")]
    InsufficientData { required: usize, available: usize },
    #[error("invalid moving-average windows: short={short}, long={long} (need 1 <= short < long)")]
    InvalidWindows { short: usize, long: usize },
}

/// Moving averages computed for one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverAverages {
    pub short: MovingAverage,
    pub long: MovingAverage,
}

/// Short/long moving-average crossover check on the last bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendEvaluator {
    short_window: usize,
    long_window: usize,
}

impl TrendEvaluator {
    pub fn new(short_window: usize, long_window: usize) -> Result<Self, TrendError> {
        if short_window == 0 || short_window >= long_window {
            return Err(TrendError::InvalidWindows {
                short: short_window,
                long: long_window,
            });
        }
        Ok(Self {
            short_window,
            long_window,
        })
    }

    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }

    pub fn averages(&self, series: &PriceSeries) -> CrossoverAverages {
        let closes = series.closes();
        CrossoverAverages {
            short: MovingAverage::from_closes(&closes, self.short_window),
            long: MovingAverage::from_closes(&closes, self.long_window),
        }
    }

    /// Fails with `InsufficientData` rather than comparing undefined averages.
    pub fn try_evaluate(&self, series: &PriceSeries) -> Result<Trend, TrendError> {
        let averages = self.averages(series);
        self.compare(&averages, series.len())
    }

    /// Like `try_evaluate`, but insufficient data maps to `Trend::Unknown`.
    pub fn evaluate(&self, series: &PriceSeries) -> Trend {
        self.try_evaluate(series).unwrap_or(Trend::Unknown)
    }

    /// Trend from averages that were already computed for a series of `len` points.
    pub fn compare(&self, averages: &CrossoverAverages, len: usize) -> Result<Trend, TrendError> {
        let insufficient = TrendError::InsufficientData {
            required: self.long_window,
            available: len,
        };
        if len < self.long_window {
            return Err(insufficient);
        }

        match (averages.short.latest(), averages.long.latest()) {
            (Some(short), Some(long)) if short.is_finite() && long.is_finite() => {
                // Ties count as bearish
                Ok(if short > long { Trend::Bullish } else { Trend::Bearish })
            }
            _ => Err(insufficient),
        }
    }
}

impl Default for TrendEvaluator {
    fn default() -> Self {
        Self {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
        }
    }
}
