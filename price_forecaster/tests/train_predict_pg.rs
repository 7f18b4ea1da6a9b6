//! `TEST_DATABASE_URL=postgres://... cargo test -p price_forecaster -- --ignored`

use chrono::{Duration, TimeZone, Utc};
use market_data_ingestor::models::bar::PriceBar;
use price_forecaster::{
    artifact::ModelArtifact,
    model::TrainConfig,
    pipeline::{predict_next, train_for_asset},
};
use price_store::{
    db::{connection::connect_postgres, migrate::ensure_schema},
    repo::{PgPriceRepo, PriceRepo},
};
use serial_test::serial;
use shared_utils::config::DbConfig;

const SYMBOL: &str = "TEST_FCAST";

fn test_db() -> DbConfig {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL");
    DbConfig::from_lookup(|key| (key == "DATABASE_URL").then(|| url.clone())).unwrap()
}

#[test]
#[ignore = "needs TEST_DATABASE_URL"]
#[serial]
fn train_then_predict_from_the_store() {
    let db = test_db();
    ensure_schema(&db).unwrap();

    let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let bars: Vec<PriceBar> = (0..80)
        .map(|i| {
            let close = 1_000.0 + 25.0 * (i as f64 / 5.0).sin();
            PriceBar {
                symbol: SYMBOL.to_string(),
                timestamp: start + Duration::days(i),
                open: close,
                high: close + 5.0,
                low: close - 5.0,
                close,
            }
        })
        .collect();
    let mut conn = connect_postgres(&db).unwrap();
    PgPriceRepo::new().insert_bars(&mut conn, &bars).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let cfg = TrainConfig {
        asset: SYMBOL.to_string(),
        look_back: 10,
        epochs: 3,
        hidden_sizes: vec![8, 8],
        output: dir.path().join("lstm_model.json"),
        ..TrainConfig::default()
    };

    let artifact = train_for_asset(&db, &cfg).unwrap();
    artifact.save(&cfg.output).unwrap();
    let reloaded = ModelArtifact::load(&cfg.output).unwrap();

    let a = predict_next(&db, &artifact).unwrap();
    let b = predict_next(&db, &reloaded).unwrap();
    assert_eq!(a, b);
    assert!(a.is_finite());
}
