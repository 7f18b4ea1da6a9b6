//! CoinGecko public REST API (`/coins/{id}/ohlc`).

pub mod params;
pub mod provider;
pub mod response;

pub use provider::{CoinGeckoProvider, DEFAULT_BASE_URL};
