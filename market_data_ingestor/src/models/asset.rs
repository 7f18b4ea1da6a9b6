use serde::{Deserialize, Serialize};

/// A tracked asset: the provider-side id used in requests and the symbol the
/// rows are stored under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Asset {
    /// CoinGecko coin id (e.g., "bitcoin").
    pub coin_id: String,
    /// Store key written to `crypto_data.coin_id` (e.g., "BTC").
    pub symbol: String,
}

impl Asset {
    pub fn new(coin_id: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            coin_id: coin_id.into(),
            symbol: symbol.into(),
        }
    }
}

/// The assets ingested when no configuration file names any.
pub fn default_assets() -> Vec<Asset> {
    vec![
        Asset::new("bitcoin", "BTC"),
        Asset::new("ethereum", "ETH"),
        Asset::new("ripple", "XRP"),
        Asset::new("solana", "SOL"),
    ]
}
