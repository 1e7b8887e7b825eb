use crate::models::{PricePoint, PriceSeries, SeriesError};
use crate::utils::{log_export, MovingAverage};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

pub const CSV_MIME: &str = "text/csv";

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),
    #[error("row {row}: cannot parse timestamp `{value}`")]
    Timestamp { row: usize, value: String },
    #[error("{column} has {actual} values but the series has {expected} rows")]
    Misaligned {
        column: String,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Deserialize)]
struct ImportRow {
    #[serde(rename = "Date", alias = "Datetime", alias = "date", alias = "time")]
    date: String,
    #[serde(rename = "Open", alias = "open")]
    open: f64,
    #[serde(rename = "High", alias = "high")]
    high: f64,
    #[serde(rename = "Low", alias = "low")]
    low: f64,
    #[serde(rename = "Close", alias = "close")]
    close: f64,
    #[serde(rename = "Volume", alias = "volume")]
    volume: u64,
}

/// Writes `Date,Open,High,Low,Close,Volume` plus one column per moving average.
///
/// Absent averages are empty fields. Floats use the shortest representation that
/// parses back to the same value.
pub fn write_csv<W: Write>(
    writer: W,
    series: &PriceSeries,
    averages: &[&MovingAverage],
) -> Result<(), CsvError> {
    for ma in averages {
        if ma.len() != series.len() {
            return Err(CsvError::Misaligned {
                column: ma.column_name(),
                expected: series.len(),
                actual: ma.len(),
            });
        }
    }

    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<String> = ["Date", "Open", "High", "Low", "Close", "Volume"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(averages.iter().map(|ma| ma.column_name()));
    wtr.write_record(&header)?;

    for (i, point) in series.points().iter().enumerate() {
        let mut record = vec![
            point.time.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            point.open.to_string(),
            point.high.to_string(),
            point.low.to_string(),
            point.close.to_string(),
            point.volume.to_string(),
        ];
        record.extend(
            averages
                .iter()
                .map(|ma| ma.get(i).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn to_csv_bytes(series: &PriceSeries, averages: &[&MovingAverage]) -> Result<Vec<u8>, CsvError> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, series, averages)?;
    Ok(buffer)
}

pub fn save_csv(
    path: impl AsRef<Path>,
    series: &PriceSeries,
    averages: &[&MovingAverage],
) -> Result<(), CsvError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(file, series, averages)?;
    log_export(&format!("Wrote {} rows to {}", series.len(), path.display()));
    Ok(())
}

/// Reads a series written by `write_csv`; extra columns are ignored.
pub fn read_csv<R: Read>(reader: R) -> Result<PriceSeries, CsvError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut points = Vec::new();

    for (row, result) in rdr.deserialize::<ImportRow>().enumerate() {
        let record = result?;
        let time = parse_timestamp(&record.date).ok_or_else(|| CsvError::Timestamp {
            row: row + 1,
            value: record.date.clone(),
        })?;
        points.push(PricePoint::new(
            time,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        ));
    }

    Ok(PriceSeries::new(points)?)
}

pub fn load_csv(path: impl AsRef<Path>) -> Result<PriceSeries, CsvError> {
    let file = File::open(path.as_ref())?;
    read_csv(file)
}

/// Accepts RFC 3339 (with `T` or a space) or a bare `YYYY-MM-DD` date.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
