//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, the interface the
//! ingestion loop uses to fetch raw OHLC tuples for one asset. The concrete
//! implementation is [`coingecko::CoinGeckoProvider`]; tests drive the loop
//! with in-memory providers.
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`dyn DataProvider`).
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data_ingestor::models::{bar::OhlcTuple, request_params::OhlcRequestParams};
//! use market_data_ingestor::providers::{DataProvider, ProviderError};
//!
//! struct FixedProvider;
//!
//! #[async_trait]
//! impl DataProvider for FixedProvider {
//!     async fn fetch_ohlc(
//!         &self,
//!         _params: &OhlcRequestParams,
//!     ) -> Result<Vec<OhlcTuple>, ProviderError> {
//!         Ok(vec![OhlcTuple(1_700_000_000_000, 1.0, 2.0, 0.5, 1.5)])
//!     }
//! }
//! ```

pub mod coingecko;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{bar::OhlcTuple, request_params::OhlcRequestParams};

/// Trait for fetching OHLC data from a market data provider.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetches the OHLC tuples for the given request, ordered as returned by
    /// the provider.
    ///
    /// Any non-success response is an error; nothing is retried.
    async fn fetch_ohlc(&self, params: &OhlcRequestParams) -> Result<Vec<OhlcTuple>, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API key contains invalid characters.
    #[snafu(display("Invalid API key format: {source}"))]
    InvalidApiKey {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, undecodable body).
    #[snafu(display("API request for {coin_id} failed: {source}"))]
    Reqwest {
        coin_id: String,
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider answered with a non-success HTTP status.
    #[snafu(display("API returned {status} for {coin_id}: {body}"))]
    Status {
        coin_id: String,
        status: reqwest::StatusCode,
        body: String,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },
}

impl ProviderError {
    /// HTTP status of a rejected request, if the provider answered at all.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
