//! Basic Analysis Example
//!
//! Fetches two years of daily bars for a few tickers, prints the company
//! summary and the 50/200 crossover call, then exports the first one.

use std::error::Error;
use tickerscope::prelude::*;
use tickerscope::services::save_csv;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tickerscope::init_logger()?;

    println!("🚀 Basic Analysis Example");
    println!("{}", "=".repeat(60));

    let analyzer = AnalysisBuilder::new()
        .with_timeout(std::time::Duration::from_secs(15))
        .build()?;

    let mut first: Option<AnalysisReport> = None;
    for ticker in ["AAPL", "TCS.NS", "INFY.NS"] {
        // Six months of daily bars is too short for MA200, so ask for two years
        let request = FetchRequest::parse(ticker, Some("1d"), Some("2y"))?;

        match analyzer.analyze(&request).await {
            Ok(report) => {
                println!("\n📊 {} - {}", report.request.symbol, report.company.name());
                for (label, value) in report.company.summary_rows() {
                    println!("   {}: {}", label, value);
                }
                println!("   Bars: {}", report.series.len());
                println!("   🔮 {}", report.trend_label());
                first.get_or_insert(report);
            }
            Err(AnalysisError::NoData { symbol, .. }) => {
                println!("\n⚠️ No data found for {}", symbol);
            }
            Err(e) => println!("\n❌ {} failed: {}", ticker, e),
        }
    }

    if let Some(report) = first {
        let csv_path = std::env::temp_dir().join(report.request.csv_file_name());
        save_csv(&csv_path, &report.series, &[&report.short_ma, &report.long_ma])?;
        println!("\n📥 Saved {}", csv_path.display());

        let chart_path = std::env::temp_dir().join(format!("{}_chart.html", report.request.symbol));
        std::fs::write(&chart_path, report.chart_html(Theme::Dark))?;
        println!("🕯️ Saved {}", chart_path.display());
    }

    Ok(())
}
