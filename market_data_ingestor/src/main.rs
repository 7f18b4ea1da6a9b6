use std::error::Error;
use std::io::{self, Write};

use clap::Parser;
use market_data_ingestor::{
    cli::commands::{Cli, Commands},
    models::request_params::OhlcRequestParams,
    normalize::process_market_data,
    providers::{DataProvider, coingecko::CoinGeckoProvider},
};
use shared_utils::{env::load_dotenv, logging::init_tracing};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    load_dotenv();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            coin_id,
            symbol,
            days,
            vs_currency,
        } => {
            let symbol = symbol.unwrap_or_else(|| coin_id.to_uppercase());
            let provider = CoinGeckoProvider::new()?;
            let params = OhlcRequestParams::new(coin_id, vs_currency.to_lowercase(), days);

            let raw = provider.fetch_ohlc(&params).await?;
            let bars = process_market_data(&symbol, &raw)?;

            // One JSON object per line on stdout; logs go to stderr.
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for bar in &bars {
                serde_json::to_writer(&mut out, bar)?;
                out.write_all(b"\n")?;
            }
            out.flush()?;

            info!(%symbol, rows = bars.len(), "fetched");
        }
    }
    Ok(())
}
