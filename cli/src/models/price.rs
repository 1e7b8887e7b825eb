use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PricePoint {
    pub fn new(time: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Bar with every price equal to `close`, handy for indicator input.
    pub fn flat(time: DateTime<Utc>, close: f64) -> Self {
        Self::new(time, close, close, close, close, 0)
    }

    fn invalid_field(&self) -> Option<&'static str> {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite() || *value < 0.0)
        .map(|(name, _)| name)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("timestamp at index {index} is not after the previous one")]
    Unordered { index: usize },
    #[error("field `{field}` at index {index} is negative or not finite")]
    InvalidValue { index: usize, field: &'static str },
}

/// Time-ordered price history. Timestamps are strictly ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        for (index, point) in points.iter().enumerate() {
            if let Some(field) = point.invalid_field() {
                return Err(SeriesError::InvalidValue { index, field });
            }
            if index > 0 && point.time <= points[index - 1].time {
                return Err(SeriesError::Unordered { index });
            }
        }
        Ok(Self { points })
    }

    /// Sorts by time and keeps the last bar for duplicated timestamps before validating.
    pub fn from_unsorted(mut points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        points.sort_by_key(|p| p.time);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.time == point.time => *last = point,
                _ => deduped.push(point),
            }
        }
        Self::new(deduped)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Aggregates bars into fixed buckets aligned to the Unix epoch.
    ///
    /// Open comes from the first bar in a bucket, close from the last, high/low are
    /// extremes and volumes are summed. The bucket start becomes the timestamp.
    pub fn resample(&self, bucket_secs: i64) -> Self {
        if bucket_secs <= 0 {
            return self.clone();
        }

        let mut buckets: Vec<PricePoint> = Vec::new();
        for point in &self.points {
            let ts = point.time.timestamp();
            let start = ts - ts.rem_euclid(bucket_secs);
            match buckets.last_mut() {
                Some(bar) if bar.time.timestamp() == start => {
                    bar.high = bar.high.max(point.high);
                    bar.low = bar.low.min(point.low);
                    bar.close = point.close;
                    bar.volume += point.volume;
                }
                _ => {
                    let time = DateTime::<Utc>::from_timestamp(start, 0).unwrap_or(point.time);
                    buckets.push(PricePoint { time, ..point.clone() });
                }
            }
        }

        // Buckets come from ascending input and are strictly increasing.
        Self { points: buckets }
    }
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let points = Vec::<PricePoint>::deserialize(deserializer)?;
        PriceSeries::new(points).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_rejects_unordered_points() {
        let points = vec![PricePoint::flat(at(200), 1.0), PricePoint::flat(at(100), 1.0)];
        assert_eq!(PriceSeries::new(points), Err(SeriesError::Unordered { index: 1 }));
    }

    #[test]
    fn test_rejects_duplicate_timestamps() {
        let points = vec![PricePoint::flat(at(100), 1.0), PricePoint::flat(at(100), 2.0)];
        assert!(PriceSeries::new(points).is_err());
    }

    #[test]
    fn test_rejects_negative_and_nan_prices() {
        let mut bad = PricePoint::flat(at(100), 1.0);
        bad.low = -0.5;
        assert_eq!(
            PriceSeries::new(vec![bad]),
            Err(SeriesError::InvalidValue { index: 0, field: "low" })
        );

        let nan = PricePoint::flat(at(100), f64::NAN);
        assert!(PriceSeries::new(vec![nan]).is_err());
    }

    #[test]
    fn test_from_unsorted_sorts_and_keeps_last_duplicate() {
        let points = vec![
            PricePoint::flat(at(300), 3.0),
            PricePoint::flat(at(100), 1.0),
            PricePoint::flat(at(300), 4.0),
        ];
        let series = PriceSeries::from_unsorted(points).unwrap();
        assert_eq!(series.closes(), vec![1.0, 4.0]);
    }

    #[test]
    fn test_resample_ten_minute_buckets() {
        let base = 1_700_000_400; // multiple of 600
        let points = vec![
            PricePoint::new(at(base), 10.0, 12.0, 9.0, 11.0, 100),
            PricePoint::new(at(base + 300), 11.0, 13.0, 10.5, 12.5, 50),
            PricePoint::new(at(base + 600), 12.5, 12.6, 8.0, 9.0, 25),
        ];
        let series = PriceSeries::new(points).unwrap().resample(600);

        assert_eq!(series.len(), 2);
        let first = &series.points()[0];
        assert_eq!(first.time, at(base));
        assert_eq!(first.open, 10.0);
        assert_eq!(first.high, 13.0);
        assert_eq!(first.low, 9.0);
        assert_eq!(first.close, 12.5);
        assert_eq!(first.volume, 150);
        assert_eq!(series.points()[1].close, 9.0);
    }

    #[test]
    fn test_resample_aligns_bucket_start() {
        let base = 1_700_000_400;
        let points = vec![PricePoint::flat(at(base + 300), 5.0)];
        let series = PriceSeries::new(points).unwrap().resample(600);
        assert_eq!(series.points()[0].time, at(base));
    }

    #[test]
    fn test_json_deserialize_validates_order() {
        let series = PriceSeries::new(vec![PricePoint::flat(at(100), 1.0), PricePoint::flat(at(200), 2.0)]).unwrap();
        let json = serde_json::to_string(&series).unwrap();
        assert!(json.starts_with('['));
        assert_eq!(serde_json::from_str::<PriceSeries>(&json).unwrap(), series);

        let reversed = r#"[{"time":"2024-01-02T00:00:00Z","open":1,"high":1,"low":1,"close":1,"volume":0},
                           {"time":"2024-01-01T00:00:00Z","open":1,"high":1,"low":1,"close":1,"volume":0}]"#;
        assert!(serde_json::from_str::<PriceSeries>(reversed).is_err());
    }
}
