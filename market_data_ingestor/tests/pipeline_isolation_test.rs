mod common;

use std::sync::Mutex;

use async_trait::async_trait;
use market_data_ingestor::{
    config::IngestConfig,
    io::sink::{DataSink, SinkError},
    models::{asset::Asset, bar::PriceBar},
    pipeline::{IngestError, ingest_assets},
    providers::coingecko::CoinGeckoProvider,
};

#[derive(Default)]
struct RecordingSink(Mutex<Vec<PriceBar>>);

#[async_trait]
impl DataSink for RecordingSink {
    type Output = usize;

    async fn write(&self, bars: &[PriceBar]) -> Result<usize, SinkError> {
        self.0.lock().unwrap().extend_from_slice(bars);
        Ok(bars.len())
    }
}

#[tokio::test]
async fn http_error_on_one_asset_keeps_the_others() {
    let server = common::start(|target| {
        if target.contains("/coins/nonexistent/") {
            (404, r#"{"error":"coin not found"}"#.to_string())
        } else if target.contains("/coins/bitcoin/") {
            (200, common::ohlc_body(4))
        } else {
            (200, common::ohlc_body(2))
        }
    })
    .await;
    let provider = CoinGeckoProvider::with_base_url(&server.base_url).unwrap();
    let sink = RecordingSink::default();
    let cfg = IngestConfig {
        assets: vec![
            Asset::new("bitcoin", "BTC"),
            Asset::new("nonexistent", "NOPE"),
            Asset::new("solana", "SOL"),
        ],
        ..IngestConfig::default()
    };

    let report = ingest_assets(&provider, &sink, &cfg).await;

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.total_inserted(), 6);
    let failed: Vec<_> = report.failures().map(|(a, _)| a.symbol.clone()).collect();
    assert_eq!(failed, vec!["NOPE"]);
    assert!(matches!(
        report.failures().next().map(|(_, e)| e),
        Some(IngestError::Fetch { .. })
    ));

    let rows = sink.0.lock().unwrap();
    assert_eq!(rows.iter().filter(|b| b.symbol == "BTC").count(), 4);
    assert_eq!(rows.iter().filter(|b| b.symbol == "SOL").count(), 2);
    assert!(rows.iter().all(|b| b.symbol != "NOPE"));

    // Assets are processed in configuration order.
    let requests = server.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[0].contains("/coins/bitcoin/"));
    assert!(requests[2].contains("/coins/solana/"));
}
