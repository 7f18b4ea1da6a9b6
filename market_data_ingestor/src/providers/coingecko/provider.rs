use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::{
    Client,
    header::{self, HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    models::{bar::OhlcTuple, request_params::OhlcRequestParams},
    providers::{
        ClientBuildSnafu, DataProvider, InvalidApiKeySnafu, ProviderError, ProviderInitError,
        ReqwestSnafu, StatusSnafu,
        coingecko::{
            params::{construct_params, validate_params},
            response::{OhlcResponse, error_message},
        },
    },
};

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Public-tier budget.
fn default_quota() -> Quota {
    Quota::per_minute(nonzero!(30u32))
}

pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
}

impl CoinGeckoProvider {
    /// Creates a provider for the public CoinGecko API.
    ///
    /// Reads the optional `COINGECKO_API_KEY` (sent as a demo-plan key) and
    /// `COINGECKO_BASE_URL` environment variables.
    pub fn new() -> Result<Self, ProviderInitError> {
        let base_url =
            get_env_var("COINGECKO_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_key = get_env_var("COINGECKO_API_KEY").ok().map(SecretString::from);

        Self::build(base_url, api_key, default_quota(), true)
    }

    /// Creates a provider that talks to `base_url` directly, bypassing any
    /// system proxy. Used for mirrors and local endpoints.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderInitError> {
        Self::build(base_url.into(), None, default_quota(), false)
    }

    fn build(
        base_url: String,
        api_key: Option<SecretString>,
        quota: Quota,
        system_proxy: bool,
    ) -> Result<Self, ProviderInitError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let mut value =
                HeaderValue::from_str(key.expose_secret()).context(InvalidApiKeySnafu)?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("market_data_ingestor/", env!("CARGO_PKG_VERSION")));
        if !system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter: RateLimiter::direct(quota),
        })
    }
}

#[async_trait]
impl DataProvider for CoinGeckoProvider {
    async fn fetch_ohlc(&self, params: &OhlcRequestParams) -> Result<Vec<OhlcTuple>, ProviderError> {
        validate_params(params)?;

        self.limiter.until_ready().await;

        let url = format!("{}/coins/{}/ohlc", self.base_url, params.coin_id);
        debug!(%url, vs_currency = %params.vs_currency, days = %params.days, "requesting OHLC");

        let response = self
            .client
            .get(&url)
            .query(&construct_params(params))
            .send()
            .await
            .context(ReqwestSnafu {
                coin_id: &params.coin_id,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return StatusSnafu {
                coin_id: &params.coin_id,
                status,
                body: error_message(&body),
            }
            .fail();
        }

        let tuples = response
            .json::<OhlcResponse>()
            .await
            .context(ReqwestSnafu {
                coin_id: &params.coin_id,
            })?;

        debug!(coin_id = %params.coin_id, rows = tuples.len(), "received OHLC");
        Ok(tuples)
    }
}
