use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RequestError {
    #[error("stock symbol is empty")]
    EmptySymbol,
    #[error("invalid stock symbol `{0}`")]
    InvalidSymbol(String),
    #[error("unknown interval `{0}` (expected one of 5m, 10m, 15m, 1d, 1wk, 1mo)")]
    UnknownInterval(String),
    #[error("unknown lookback `{0}` (expected one of 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max)")]
    UnknownLookback(String),
}

/// Normalised ticker symbol, e.g. `AAPL`, `TCS.NS`, `^GSPC`, `EURUSD=X`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(raw: &str) -> Result<Self, RequestError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RequestError::EmptySymbol);
        }

        let valid = trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
        if !valid {
            return Err(RequestError::InvalidSymbol(trimmed.to_string()));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = RequestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Symbol::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

/// Bar size offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "10m")]
    TenMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1wk")]
    OneWeek,
    #[serde(rename = "1mo")]
    OneMonth,
}

impl Interval {
    pub const ALL: [Interval; 6] = [
        Interval::FiveMinutes,
        Interval::TenMinutes,
        Interval::FifteenMinutes,
        Interval::OneDay,
        Interval::OneWeek,
        Interval::OneMonth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::FiveMinutes => "5m",
            Interval::TenMinutes => "10m",
            Interval::FifteenMinutes => "15m",
            Interval::OneDay => "1d",
            Interval::OneWeek => "1wk",
            Interval::OneMonth => "1mo",
        }
    }

    /// Lookback used when the caller does not pick one.
    pub fn default_lookback(&self) -> Lookback {
        match self {
            Interval::FiveMinutes => Lookback::OneDay,
            Interval::TenMinutes => Lookback::OneDay,
            Interval::FifteenMinutes => Lookback::FiveDays,
            Interval::OneDay => Lookback::SixMonths,
            Interval::OneWeek => Lookback::TwoYears,
            Interval::OneMonth => Lookback::FiveYears,
        }
    }

    /// Interval code understood by the data provider.
    pub fn provider_code(&self) -> &'static str {
        match self {
            // No native 10 minute bars; fetched as 5m and resampled
            Interval::TenMinutes => "5m",
            other => other.as_str(),
        }
    }

    /// Bucket size when provider bars have to be aggregated client-side.
    pub fn resample_secs(&self) -> Option<i64> {
        match self {
            Interval::TenMinutes => Some(600),
            _ => None,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Interval::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RequestError::UnknownInterval(wanted.to_string()))
    }
}

/// How far back history is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lookback {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "max")]
    Max,
}

impl Lookback {
    pub const ALL: [Lookback; 11] = [
        Lookback::OneDay,
        Lookback::FiveDays,
        Lookback::OneMonth,
        Lookback::ThreeMonths,
        Lookback::SixMonths,
        Lookback::OneYear,
        Lookback::TwoYears,
        Lookback::FiveYears,
        Lookback::TenYears,
        Lookback::YearToDate,
        Lookback::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Lookback::OneDay => "1d",
            Lookback::FiveDays => "5d",
            Lookback::OneMonth => "1mo",
            Lookback::ThreeMonths => "3mo",
            Lookback::SixMonths => "6mo",
            Lookback::OneYear => "1y",
            Lookback::TwoYears => "2y",
            Lookback::FiveYears => "5y",
            Lookback::TenYears => "10y",
            Lookback::YearToDate => "ytd",
            Lookback::Max => "max",
        }
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lookback {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Lookback::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RequestError::UnknownLookback(wanted.to_string()))
    }
}

/// One user selection: which ticker, at which bar size, how far back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchRequest {
    pub symbol: Symbol,
    pub interval: Interval,
    pub lookback: Lookback,
}

impl FetchRequest {
    pub fn new(symbol: Symbol, interval: Interval) -> Self {
        Self {
            symbol,
            lookback: interval.default_lookback(),
            interval,
        }
    }

    pub fn with_lookback(self, lookback: Lookback) -> Self {
        Self { lookback, ..self }
    }

    /// Builds a request from raw user input; blank interval/lookback fall back to defaults.
    pub fn parse(
        symbol: &str,
        interval: Option<&str>,
        lookback: Option<&str>,
    ) -> Result<Self, RequestError> {
        let symbol = Symbol::parse(symbol)?;
        let interval = match interval.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse()?,
            None => Interval::OneDay,
        };
        let request = Self::new(symbol, interval);

        match lookback.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Ok(request.with_lookback(raw.parse()?)),
            None => Ok(request),
        }
    }

    /// File name offered for the CSV download.
    pub fn csv_file_name(&self) -> String {
        format!("{}_data.csv", self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_is_trimmed_and_uppercased() {
        assert_eq!(Symbol::parse("  tcs.ns ").unwrap().as_str(), "TCS.NS");
        assert_eq!(Symbol::parse("^gspc").unwrap().as_str(), "^GSPC");
    }

    #[test]
    fn test_symbol_rejects_empty_and_garbage() {
        assert_eq!(Symbol::parse("   "), Err(RequestError::EmptySymbol));
        assert!(matches!(Symbol::parse("AA PL"), Err(RequestError::InvalidSymbol(_))));
        assert!(matches!(Symbol::parse("../etc"), Err(RequestError::InvalidSymbol(_))));
    }

    #[test]
    fn test_default_lookback_per_interval() {
        let expected = [
            ("5m", "1d"),
            ("10m", "1d"),
            ("15m", "5d"),
            ("1d", "6mo"),
            ("1wk", "2y"),
            ("1mo", "5y"),
        ];
        for (interval, lookback) in expected {
            let interval: Interval = interval.parse().unwrap();
            assert_eq!(interval.default_lookback().as_str(), lookback);
        }
    }

    #[test]
    fn test_ten_minute_interval_is_resampled() {
        assert_eq!(Interval::TenMinutes.provider_code(), "5m");
        assert_eq!(Interval::TenMinutes.resample_secs(), Some(600));
        assert_eq!(Interval::OneDay.provider_code(), "1d");
        assert_eq!(Interval::OneDay.resample_secs(), None);
    }

    #[test]
    fn test_parse_request_defaults_and_overrides() {
        let request = FetchRequest::parse("aapl", None, None).unwrap();
        assert_eq!(request.interval, Interval::OneDay);
        assert_eq!(request.lookback, Lookback::SixMonths);

        let request = FetchRequest::parse("aapl", Some("1WK"), Some("5y")).unwrap();
        assert_eq!(request.interval, Interval::OneWeek);
        assert_eq!(request.lookback, Lookback::FiveYears);

        assert!(matches!(
            FetchRequest::parse("aapl", Some("2h"), None),
            Err(RequestError::UnknownInterval(_))
        ));
        assert!(matches!(
            FetchRequest::parse("aapl", None, Some("forever")),
            Err(RequestError::UnknownLookback(_))
        ));
    }

    #[test]
    fn test_csv_file_name() {
        let request = FetchRequest::parse("infy.ns", Some("1d"), None).unwrap();
        assert_eq!(request.csv_file_name(), "INFY.NS_data.csv");
    }

    #[test]
    fn test_request_serde_uses_short_codes() {
        let request = FetchRequest::parse("msft", Some("15m"), None).unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["symbol"], "MSFT");
        assert_eq!(json["interval"], "15m");
        assert_eq!(json["lookback"], "5d");
    }
}
