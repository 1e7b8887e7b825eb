use crate::models::{CompanyProfile, FetchRequest, PriceSeries, SeriesError, Symbol};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("provider returned {code}: {description}")]
    Provider { code: String, description: String },
    #[error("unexpected HTTP status {status}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("invalid price data: {0}")]
    InvalidSeries(#[from] SeriesError),
    #[error("gave up after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

impl MarketDataError {
    /// Whether the provider rejected the credentials/crumb of the request.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            MarketDataError::Status { status, .. } => *status == 401,
            MarketDataError::Provider { code, .. } => code.eq_ignore_ascii_case("unauthorized"),
            _ => false,
        }
    }
}

/// Source of price history and company metadata.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Price history for the request; an unknown or quiet symbol yields an empty series.
    async fn history(&self, request: &FetchRequest) -> Result<PriceSeries, MarketDataError>;

    async fn company_profile(&self, symbol: &Symbol) -> Result<CompanyProfile, MarketDataError>;
}
