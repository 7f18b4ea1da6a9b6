//! The ingestion loop: fetch → normalize → write, one asset at a time.
//!
//! Each asset runs inside its own failure boundary. An error is logged and
//! recorded in the [`IngestReport`], and the loop continues with the next
//! asset; rows already written for earlier assets are never revisited.

use snafu::{Backtrace, ResultExt, Snafu};
use tracing::{error, info};

use crate::{
    config::IngestConfig,
    io::sink::{DataSink, SinkError},
    models::{
        asset::Asset,
        request_params::{Days, OhlcRequestParams},
    },
    normalize::{NormalizeError, process_market_data},
    providers::{DataProvider, ProviderError},
};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum IngestError {
    #[snafu(display("fetching {symbol} failed: {source}"))]
    Fetch {
        symbol: String,
        #[snafu(backtrace)]
        source: ProviderError,
    },

    #[snafu(display("normalizing {symbol} failed: {source}"))]
    Normalize {
        symbol: String,
        source: NormalizeError,
        backtrace: Backtrace,
    },

    #[snafu(display("writing {symbol} failed: {source}"))]
    Sink {
        symbol: String,
        #[snafu(backtrace)]
        source: SinkError,
    },
}

/// Row counts for one successfully ingested asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetSummary {
    /// Bars returned by the provider.
    pub fetched: usize,
    /// Bars that were new to the store.
    pub inserted: usize,
}

#[derive(Debug)]
pub struct AssetOutcome {
    pub asset: Asset,
    pub result: Result<AssetSummary, IngestError>,
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub outcomes: Vec<AssetOutcome>,
}

impl IngestReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn total_inserted(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|s| s.inserted)
            .sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Asset, &IngestError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.asset, e)))
    }
}

/// Fetches, normalizes and writes a single asset.
pub async fn ingest_asset<P, S>(
    provider: &P,
    sink: &S,
    asset: &Asset,
    vs_currency: &str,
    days: Days,
) -> Result<AssetSummary, IngestError>
where
    P: DataProvider + ?Sized,
    S: DataSink<Output = usize> + ?Sized,
{
    let params = OhlcRequestParams::new(&asset.coin_id, vs_currency, days);
    let raw = provider.fetch_ohlc(&params).await.context(FetchSnafu {
        symbol: &asset.symbol,
    })?;

    let bars = process_market_data(&asset.symbol, &raw).context(NormalizeSnafu {
        symbol: &asset.symbol,
    })?;

    let inserted = sink.write(&bars).await.context(SinkSnafu {
        symbol: &asset.symbol,
    })?;

    Ok(AssetSummary {
        fetched: bars.len(),
        inserted,
    })
}

/// Runs [`ingest_asset`] for every configured asset, sequentially, and
/// collects the per-asset results. Never fails as a whole.
pub async fn ingest_assets<P, S>(provider: &P, sink: &S, cfg: &IngestConfig) -> IngestReport
where
    P: DataProvider + ?Sized,
    S: DataSink<Output = usize> + ?Sized,
{
    let mut report = IngestReport::default();

    for asset in &cfg.assets {
        info!(symbol = %asset.symbol, coin_id = %asset.coin_id, "Fetching data");

        let result = ingest_asset(provider, sink, asset, &cfg.vs_currency, cfg.days).await;
        match &result {
            Ok(summary) => info!(
                symbol = %asset.symbol,
                fetched = summary.fetched,
                inserted = summary.inserted,
                "Stored bars"
            ),
            Err(e) => error!(symbol = %asset.symbol, error = %e, "Skipping asset"),
        }

        report.outcomes.push(AssetOutcome {
            asset: asset.clone(),
            result,
        });
    }

    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        inserted = report.total_inserted(),
        "Ingestion finished"
    );
    report
}
