use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use market_data_ingestor::{
    cli::params::IngestArgs, pipeline::ingest_assets, providers::coingecko::CoinGeckoProvider,
};
use price_store::{db::migrate::ensure_schema, sink::PgBarSink};
use shared_utils::{config::DbConfig, env::load_dotenv, logging::init_tracing};
use tracing::info;

#[derive(Parser)]
#[command(version, about = "Fetch daily OHLC for the tracked coins into crypto_data")]
struct Cli {
    #[command(flatten)]
    ingest: IngestArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    if let Some(path) = load_dotenv() {
        info!(path = %path.display(), "loaded .env");
    }
    let cli = Cli::parse();

    let cfg = cli.ingest.resolve()?;
    let db = Arc::new(DbConfig::from_env()?);
    info!(target_db = %db.describe(), assets = cfg.assets.len(), days = %cfg.days, "starting ingestion");

    // Without the table and its unique index nothing below can succeed.
    {
        let db = Arc::clone(&db);
        tokio::task::spawn_blocking(move || ensure_schema(&db))
            .await?
            .context("schema setup failed")?;
    }

    let provider = CoinGeckoProvider::new()?;
    let sink = PgBarSink::new(db);
    let report = ingest_assets(&provider, &sink, &cfg).await;

    // Print summary to stderr so it doesn't interfere with anything parsing stdout
    for (asset, err) in report.failures() {
        eprintln!("ERROR: {} - {}", asset.symbol, err);
    }
    eprintln!(
        "SUMMARY: {} succeeded, {} failed, {} rows inserted",
        report.succeeded(),
        report.failed(),
        report.total_inserted()
    );

    if report.failed() > 0 {
        anyhow::bail!("{} of {} assets failed", report.failed(), cfg.assets.len());
    }
    Ok(())
}
