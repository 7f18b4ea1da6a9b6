use clap::{Parser, Subcommand};

use crate::models::request_params::Days;

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch OHLC bars for one coin and print them as JSON lines
    Fetch {
        /// Provider-side coin id (e.g. "bitcoin")
        #[arg(long)]
        coin_id: String,

        /// Symbol to tag the bars with; defaults to the upper-cased coin id
        #[arg(long)]
        symbol: Option<String>,

        /// Days of history: a positive integer or "max"
        #[arg(long, default_value_t = Days::default())]
        days: Days,

        /// Quote currency
        #[arg(long, default_value = "usd")]
        vs_currency: String,
    },
}
