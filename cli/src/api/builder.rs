//! Builder pattern for configuring stock analysis operations

use crate::api::analyzer::{AnalysisError, StockAnalyzer};
use crate::services::{MarketDataProvider, YahooClient, YahooConfig};
use crate::utils::{TrendEvaluator, DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW};
use std::sync::Arc;
use std::time::Duration;

/// Builder for a [`StockAnalyzer`].
///
/// # Example
/// ```rust,no_run
/// use tickerscope::api::AnalysisBuilder;
///
/// let analyzer = AnalysisBuilder::new()
///     .with_windows(20, 100)
///     .with_timeout(std::time::Duration::from_secs(10))
///     .build()
///     .expect("valid configuration");
/// ```
pub struct AnalysisBuilder {
    provider: Option<Arc<dyn MarketDataProvider>>,
    yahoo: YahooConfig,
    short_window: usize,
    long_window: usize,
}

impl AnalysisBuilder {
    /// Create a new analysis builder with default settings
    pub fn new() -> Self {
        Self {
            provider: None,
            yahoo: YahooConfig::default(),
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
        }
    }

    /// Use a custom data provider instead of Yahoo Finance
    pub fn with_provider(mut self, provider: Arc<dyn MarketDataProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the short and long moving-average windows
    pub fn with_windows(mut self, short: usize, long: usize) -> Self {
        self.short_window = short;
        self.long_window = long;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.yahoo.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.yahoo.timeout = timeout;
        self
    }

    /// Requests per minute sent to Yahoo; 0 disables the limiter
    pub fn with_rate_limit(mut self, per_minute: u32) -> Self {
        self.yahoo.rate_limit_per_minute = per_minute;
        self
    }

    pub fn with_random_agent(mut self, enabled: bool) -> Self {
        self.yahoo.random_agent = enabled;
        self
    }

    /// Build a StockAnalyzer with the configured settings
    pub fn build(self) -> Result<StockAnalyzer, AnalysisError> {
        let evaluator = TrendEvaluator::new(self.short_window, self.long_window)?;
        let provider = match self.provider {
            Some(provider) => provider,
            None => Arc::new(YahooClient::new(self.yahoo)?),
        };
        Ok(StockAnalyzer::new(provider, evaluator))
    }
}

impl Default for AnalysisBuilder {
    fn default() -> Self {
        Self::new()
    }
}
