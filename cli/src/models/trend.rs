use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of the moving-average crossover check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    Unknown,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Bullish => "bullish",
            Trend::Bearish => "bearish",
            Trend::Unknown => "unknown",
        }
    }

    /// One-line call shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Trend::Bullish => "Bullish trend expected 📈",
            Trend::Bearish => "Bearish trend expected 📉",
            Trend::Unknown => "Trend unknown: not enough data for the long moving average",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
