//! High-level stock analyzer for easy library usage

use crate::models::{CompanyProfile, FetchRequest, PriceSeries, RequestError, Trend};
use crate::services::{
    build_figure, render_html, to_csv_bytes, CsvError, MarketDataError, MarketDataProvider,
    Overlay, Theme, YahooClient,
};
use crate::utils::{Logger, MovingAverage, Timer, TrendError, TrendEvaluator};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

pub const SHORT_MA_COLOR: &str = "blue";
pub const LONG_MA_COLOR: &str = "red";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("no data found for {symbol} (interval {interval}, lookback {lookback})")]
    NoData {
        symbol: String,
        interval: String,
        lookback: String,
    },
    #[error(transparent)]
    MarketData(#[from] MarketDataError),
    #[error(transparent)]
    Trend(#[from] TrendError),
}

/// Everything produced for one request: the raw series, both averages,
/// company metadata and the trend call.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub request: FetchRequest,
    pub series: PriceSeries,
    pub short_ma: MovingAverage,
    pub long_ma: MovingAverage,
    pub company: CompanyProfile,
    pub trend: Trend,
    pub generated_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn trend_label(&self) -> &'static str {
        self.trend.label()
    }

    pub fn to_csv(&self) -> Result<Vec<u8>, CsvError> {
        to_csv_bytes(&self.series, &[&self.short_ma, &self.long_ma])
    }

    pub fn figure(&self, theme: Theme) -> Value {
        build_figure(
            &self.series,
            &[
                Overlay::new(&self.short_ma, SHORT_MA_COLOR),
                Overlay::new(&self.long_ma, LONG_MA_COLOR),
            ],
            theme,
        )
    }

    pub fn chart_html(&self, theme: Theme) -> String {
        let title = format!(
            "{} ({}) - {} / {}",
            self.company.name(),
            self.request.symbol,
            self.request.interval,
            self.request.lookback
        );
        render_html(&title, &self.figure(theme), theme)
    }
}

/// Fetch, compute and evaluate pipeline over any market-data provider.
pub struct StockAnalyzer {
    provider: Arc<dyn MarketDataProvider>,
    evaluator: TrendEvaluator,
    logger: Logger,
}

impl StockAnalyzer {
    pub fn new(provider: Arc<dyn MarketDataProvider>, evaluator: TrendEvaluator) -> Self {
        Self {
            provider,
            evaluator,
            logger: Logger::new("ANALYZER"),
        }
    }

    /// Analyzer over Yahoo Finance with the default 50/200 windows.
    pub fn yahoo() -> Result<Self, AnalysisError> {
        let client = YahooClient::with_defaults()?;
        Ok(Self::new(Arc::new(client), TrendEvaluator::default()))
    }

    pub fn evaluator(&self) -> &TrendEvaluator {
        &self.evaluator
    }

    pub fn provider(&self) -> &dyn MarketDataProvider {
        self.provider.as_ref()
    }

    /// Runs one request end to end.
    ///
    /// History and company metadata are fetched concurrently. An empty history is
    /// `AnalysisError::NoData`; a failed metadata lookup only degrades the report
    /// to "N/A" fields.
    pub async fn analyze(&self, request: &FetchRequest) -> Result<AnalysisReport, AnalysisError> {
        let timer = Timer::start(&format!("{} analysis", request.symbol));
        self.logger.info(&format!(
            "Analyzing {} via {} (interval={}, lookback={})",
            request.symbol,
            self.provider.name(),
            request.interval,
            request.lookback
        ));

        let (history, company) = futures::join!(
            self.provider.history(request),
            self.provider.company_profile(&request.symbol)
        );

        let series = history?;
        if series.is_empty() {
            return Err(AnalysisError::NoData {
                symbol: request.symbol.to_string(),
                interval: request.interval.to_string(),
                lookback: request.lookback.to_string(),
            });
        }

        let company = company.unwrap_or_else(|e| {
            self.logger
                .warn_with_error(&format!("Company info unavailable for {}", request.symbol), &e);
            CompanyProfile::unknown(request.symbol.as_str())
        });

        let averages = self.evaluator.averages(&series);
        let trend = self
            .evaluator
            .compare(&averages, series.len())
            .unwrap_or_else(|e| {
                self.logger.info(&format!("{}: {}", request.symbol, e));
                Trend::Unknown
            });

        timer.log_elapsed();
        self.logger.info(&format!(
            "{}: {} bars, trend={}",
            request.symbol,
            series.len(),
            trend
        ));

        Ok(AnalysisReport {
            request: request.clone(),
            series,
            short_ma: averages.short,
            long_ma: averages.long,
            company,
            trend,
            generated_at: Utc::now(),
        })
    }

    /// Trend of an already loaded series, e.g. one read back from CSV.
    pub fn evaluate_series(&self, series: &PriceSeries) -> Trend {
        self.evaluator.evaluate(series)
    }
}
