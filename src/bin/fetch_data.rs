//! Fetch daily stock history from Yahoo Finance
//!
//! Usage: cargo run --bin fetch_data -- --ticker AAPL --start 2023-01-01 --output aapl.csv

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use stock_forecast::api::YahooClient;
use stock_forecast::fetcher::{default_start_date, FetchWindow, Fetcher, RetryPolicy};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch daily stock data from Yahoo Finance")]
struct Args {
    /// Ticker symbol (e.g., AAPL, MSFT)
    #[arg(short, long)]
    ticker: String,

    /// First day to fetch (YYYY-MM-DD)
    #[arg(short, long)]
    start: Option<NaiveDate>,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stock_forecast=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let window = FetchWindow {
        start: args.start.unwrap_or_else(default_start_date),
        end: None,
    };
    let fetcher = Fetcher::new(YahooClient::new())
        .with_policy(RetryPolicy::default())
        .with_window(window);

    let series = match fetcher.fetch(&args.ticker).await {
        Ok(series) => series,
        Err(e) => {
            println!("{}", e.user_message());
            return Err(e.into());
        }
    };

    println!("\nFirst 5 bars:");
    println!(
        "{:<12} {:>10} {:>10} {:>10} {:>10} {:>10} {:>14}",
        "Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"
    );
    println!("{}", "-".repeat(82));

    for bar in series.bars().iter().take(5) {
        println!(
            "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>14.0}",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.adj_close, bar.volume
        );
    }

    println!("\nTotal bars: {}", series.len());

    if let Some(output) = args.output {
        series.save_csv(&output)?;
        info!("Saved data to {:?}", output);
    }

    Ok(())
}
