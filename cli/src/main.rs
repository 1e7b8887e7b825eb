use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tickerscope::{
    api::{AnalysisBuilder, AnalysisError, AnalysisReport},
    models::{FetchRequest, Interval, Lookback, Symbol},
    services::{load_csv, save_csv, Theme},
    utils::{init_logger, log_export, TrendEvaluator, DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW},
};

#[derive(Parser)]
#[command(name = "tickerscope")]
#[command(about = "Stock history, company info, CSV export and a moving-average crossover trend call")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch history for a ticker and print company info and the trend call
    Analyze {
        /// Ticker symbol (e.g. AAPL, TCS.NS, INFY.NS)
        #[arg(short, long)]
        symbol: String,
        /// Bar size: 5m, 10m, 15m, 1d, 1wk or 1mo
        #[arg(short, long, default_value = "1d")]
        interval: Interval,
        /// History to fetch (defaults depend on the interval)
        #[arg(short, long)]
        lookback: Option<Lookback>,
        /// Short moving-average window
        #[arg(long, default_value_t = DEFAULT_SHORT_WINDOW)]
        short: usize,
        /// Long moving-average window
        #[arg(long, default_value_t = DEFAULT_LONG_WINDOW)]
        long: usize,
        /// Chart theme (dark or light)
        #[arg(long, default_value = "dark")]
        theme: Theme,
        /// Write the history as CSV (defaults to SYMBOL_data.csv)
        #[arg(long, num_args = 0..=1)]
        csv: Option<Option<PathBuf>>,
        /// Write a standalone HTML candlestick chart
        #[arg(long)]
        chart: Option<PathBuf>,
        /// Print the whole report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Evaluate the trend of a CSV file exported earlier
    Evaluate {
        /// CSV file with Date,Open,High,Low,Close,Volume columns
        #[arg(short, long)]
        input: PathBuf,
        /// Short moving-average window
        #[arg(long, default_value_t = DEFAULT_SHORT_WINDOW)]
        short: usize,
        /// Long moving-average window
        #[arg(long, default_value_t = DEFAULT_LONG_WINDOW)]
        long: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            symbol,
            interval,
            lookback,
            short,
            long,
            theme,
            csv,
            chart,
            json,
        } => {
            if symbol.trim().is_empty() {
                println!("👆 Enter a stock symbol first.");
                return Ok(());
            }

            let mut request = FetchRequest::new(Symbol::parse(&symbol)?, interval);
            if let Some(lookback) = lookback {
                request = request.with_lookback(lookback);
            }

            let analyzer = AnalysisBuilder::new().with_windows(short, long).build()?;
            let report = match analyzer.analyze(&request).await {
                Ok(report) => report,
                Err(AnalysisError::NoData { .. }) => {
                    println!("⚠️ No data found! Check the stock symbol or interval settings.");
                    return Ok(());
                }
                Err(e) => {
                    println!("❌ Something went wrong: {}", e);
                    return Err(e.into());
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }

            if let Some(path) = csv {
                let path = path.unwrap_or_else(|| PathBuf::from(request.csv_file_name()));
                save_csv(&path, &report.series, &[&report.short_ma, &report.long_ma])
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("📥 Historical data saved to {}", path.display());
            }

            if let Some(path) = chart {
                std::fs::write(&path, report.chart_html(theme))
                    .with_context(|| format!("writing {}", path.display()))?;
                log_export(&format!("Chart written to {}", path.display()));
                println!("🕯️ Candlestick chart saved to {}", path.display());
            }
        }
        Commands::Evaluate { input, short, long } => {
            let evaluator = TrendEvaluator::new(short, long)?;
            let series = load_csv(&input).with_context(|| format!("reading {}", input.display()))?;
            if series.is_empty() {
                println!("⚠️ {} contains no rows.", input.display());
                return Ok(());
            }

            let averages = evaluator.averages(&series);
            println!("Rows: {}", series.len());
            println!("{}: {}", averages.short.column_name(), format_value(averages.short.latest()));
            println!("{}: {}", averages.long.column_name(), format_value(averages.long.latest()));
            println!("{}", evaluator.evaluate(&series).label());
        }
    }

    Ok(())
}

fn print_report(report: &AnalysisReport) {
    let company = &report.company;
    println!("📈 {} ({} bars, {} / {})",
        report.request.symbol,
        report.series.len(),
        report.request.interval,
        report.request.lookback
    );
    if let Some(last) = report.series.last() {
        println!("   Last close: {:.2} at {}", last.close, last.time.format("%Y-%m-%d %H:%M UTC"));
    }
    println!();
    println!("🏢 Company Information");
    for (label, value) in company.summary_rows() {
        println!("   {}: {}", label, value);
    }
    println!();
    println!(
        "   {}: {}   {}: {}",
        report.short_ma.column_name(),
        format_value(report.short_ma.latest()),
        report.long_ma.column_name(),
        format_value(report.long_ma.latest())
    );
    println!("🔮 {}", report.trend_label());
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "n/a".to_string())
}
