use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use health_screener::analysis::Screener;
use health_screener::api::{CsvSp500, StaticUniverse, UniverseProvider, WikipediaSp500, YahooClient};
use health_screener::models::{Config, UniverseSource};
use health_screener::ui::ResultTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Screen stocks on Altman Z-Score, interest coverage, ROE and EBITDA growth.
#[derive(Debug, Parser)]
#[command(name = "health-screener", version)]
struct Cli {
    /// Ticker symbols to screen, in order
    #[arg(required_unless_present = "sp500", conflicts_with = "sp500")]
    tickers: Vec<String>,

    /// Screen every S&P 500 constituent instead of an explicit list
    #[arg(long)]
    sp500: bool,

    /// Where the S&P 500 list is read from
    #[arg(long, value_enum, default_value_t = UniverseSource::Wikipedia)]
    source: UniverseSource,

    /// Output format for the passing rows
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries the result table
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("health_screener=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;

    let universe: Box<dyn UniverseProvider> = if cli.sp500 {
        match cli.source {
            UniverseSource::Wikipedia => Box::new(WikipediaSp500::new(&config)?),
            UniverseSource::Csv => Box::new(CsvSp500::new(&config)?),
        }
    } else {
        Box::new(StaticUniverse::new(cli.tickers))
    };

    let client = YahooClient::new(&config)?;
    let screener = Screener::new(client, config.criteria.clone()).with_fetch_timeout(config.ticker_timeout);

    let criteria = screener.criteria();
    info!(
        "📋 Criteria: Z > {}, ICR > {}, ROE > {}%, EBITDA growth required: {}",
        criteria.min_altman_z_score,
        criteria.min_interest_coverage,
        criteria.min_roe,
        criteria.require_ebitda_growth
    );

    let report = match screener.run_universe(universe.as_ref()).await {
        Ok(report) => report,
        Err(e) => {
            error!("Failed to load ticker universe: {}", e);
            return Err(e.into());
        }
    };

    if !report.skipped.is_empty() {
        let skipped: Vec<&str> = report.skipped.iter().map(|s| s.ticker.as_str()).collect();
        info!("⚠️  Skipped {} tickers: {}", skipped.len(), skipped.join(", "));
    }

    let table = report.table();
    info!("📊 {} tickers in the result table", table.len());
    print_table(&table, cli.format)
}

fn print_table(table: &ResultTable, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table if table.is_empty() => println!("No tickers passed all criteria."),
        OutputFormat::Table => println!("{}", table),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(table)?),
        OutputFormat::Csv => table.write_csv(std::io::stdout().lock())?,
    }
    Ok(())
}
