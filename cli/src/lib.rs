//! # tickerscope - stock history, moving averages and trend calls
//!
//! - Yahoo Finance price history and company metadata
//! - Simple moving averages aligned to the price series
//! - Short/long moving-average crossover trend call
//! - CSV export and Plotly candlestick charts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tickerscope::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let analyzer = StockAnalyzer::yahoo()?;
//!     let request = FetchRequest::parse("AAPL", Some("1d"), Some("2y"))?;
//!     let report = analyzer.analyze(&request).await?;
//!     println!("{}: {}", report.request.symbol, report.trend_label());
//!     Ok(())
//! }
//! ```

// Core modules - these contain the main functionality
pub mod models;
pub mod utils;
pub mod services;

// Analysis modules - high-level analysis functionality
pub mod analysis {
    //! Indicator and trend computations

    /// Simple moving averages
    pub mod moving_average {
        pub use crate::utils::moving_average::*;
    }

    /// Moving-average crossover trend evaluation
    pub mod trend {
        pub use crate::models::trend::*;
        pub use crate::utils::trend_evaluator::*;
    }
}

// Public API for easy library usage
pub mod api;

// Prelude for convenient imports
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use tickerscope::prelude::*;
    //! ```

    pub use crate::api::{AnalysisBuilder, AnalysisError, AnalysisReport, StockAnalyzer};
    pub use crate::models::{
        CompanyProfile, FetchRequest, Interval, Lookback, PricePoint, PriceSeries, Symbol, Trend,
    };
    pub use crate::services::{MarketDataProvider, Theme};
    pub use crate::utils::{MovingAverage, TrendEvaluator};
}

// Re-export some commonly used utilities
pub use utils::{init_logger, Logger, Timer};
