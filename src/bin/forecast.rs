//! Predict a stock's adjusted close with a Random Forest
//!
//! Usage: cargo run --bin forecast -- --ticker AAPL --predictions-csv preds.csv

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use stock_forecast::config::Config;
use stock_forecast::pipeline::Pipeline;
use stock_forecast::report::{save_correlation, save_predictions};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Train Random Forest on daily stock data")]
struct Args {
    /// Ticker symbol (e.g., AAPL, MSFT)
    #[arg(short, long)]
    ticker: String,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write date/actual/predicted rows to this CSV file
    #[arg(long)]
    predictions_csv: Option<PathBuf>,

    /// Write the correlation matrix to this CSV file
    #[arg(long)]
    correlation_csv: Option<PathBuf>,

    /// Number of rows to print
    #[arg(long, default_value = "10")]
    show: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("stock_forecast={}", config.logging.level).parse()?),
        )
        .init();

    let ticker = args.ticker.trim();
    if ticker.is_empty() {
        anyhow::bail!("Ticker must not be empty");
    }

    info!("Running forecast for {}", ticker);
    let pipeline = Pipeline::from_config(&config);

    let forecast = match pipeline.run(ticker).await {
        Ok(forecast) => forecast,
        Err(e) if e.is_no_data() => {
            info!("{}", e);
            println!("{}", e.user_message());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("===========================================");
    println!("  Random Forest Forecast - {}", forecast.ticker);
    println!("===========================================\n");

    if let Some(m) = &forecast.metrics {
        println!("Test R²:   {:.4}", m.r2);
        println!("Test RMSE: {:.4}", m.rmse);
        println!("Test MAE:  {:.4}", m.mae);
    }

    println!("\n=== Actual vs Predicted ===\n");
    println!("{:<12} {:>12} {:>12}", "Date", "Actual", "Predicted");
    println!("{}", "-".repeat(38));
    for point in forecast.chronological().iter().rev().take(args.show).rev() {
        println!(
            "{:<12} {:>12.2} {:>12.2}",
            point.date, point.actual, point.predicted
        );
    }

    println!("\n=== Feature Importance Ranking ===\n");
    for (i, (name, imp)) in forecast.feature_importances.iter().enumerate() {
        let bar = "█".repeat((imp * 40.0) as usize);
        println!("{:2}. {:14} {:.4} {}", i + 1, name, imp, bar);
    }

    if let Some(path) = &args.predictions_csv {
        save_predictions(&forecast, path)?;
        info!("Saved predictions to {:?}", path);
    }
    if let Some(path) = &args.correlation_csv {
        save_correlation(&forecast.correlation, path)?;
        info!("Saved correlation matrix to {:?}", path);
    }

    Ok(())
}
