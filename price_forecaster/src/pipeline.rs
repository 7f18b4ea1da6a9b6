//! End-to-end training and prediction over the price store.

use price_store::{
    db::connection::connect_postgres,
    repo::{PgPriceRepo, PriceRepo},
};
use rand::{SeedableRng, rngs::StdRng};
use shared_utils::config::DbConfig;
use tracing::info;

use crate::{
    artifact::ModelArtifact,
    errors::ForecastError,
    model::{LstmNetwork, TrainConfig},
    scaler::MinMaxScaler,
    trainer::train,
    window::build_windows,
};

/// Scales `closes`, windows them and trains a fresh network.
///
/// Fails with [`ForecastError::InsufficientHistory`] when the series is too
/// short to yield a single window.
pub fn fit_and_train(asset: &str, closes: &[f64], cfg: &TrainConfig) -> Result<ModelArtifact, ForecastError> {
    cfg.validate()?;
    if closes.len() <= cfg.look_back {
        return Err(ForecastError::InsufficientHistory {
            observed: closes.len(),
            required: cfg.look_back.saturating_add(1),
        });
    }

    let scaler = MinMaxScaler::fit(closes)?;
    let windows = build_windows(&scaler.transform(closes), cfg.look_back)?;

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut network = LstmNetwork::new(cfg.look_back, &cfg.hidden_sizes, &mut rng)?;
    let report = train(&mut network, &windows, cfg, &mut rng)?;

    Ok(ModelArtifact::new(asset, scaler, network, report))
}

/// Loads the close history of `cfg.asset` and trains on it.
pub fn train_for_asset(db: &DbConfig, cfg: &TrainConfig) -> anyhow::Result<ModelArtifact> {
    let closes = {
        let mut conn = connect_postgres(db)?;
        PgPriceRepo::new().load_close_series(&mut conn, &cfg.asset)?
    };
    info!(asset = %cfg.asset, rows = closes.len(), "loaded closes");

    Ok(fit_and_train(&cfg.asset, &closes, cfg)?)
}

/// Forecasts the next close of the artifact's asset from the latest stored
/// history.
pub fn predict_next(db: &DbConfig, artifact: &ModelArtifact) -> anyhow::Result<f64> {
    let closes = {
        let mut conn = connect_postgres(db)?;
        PgPriceRepo::new().latest_closes(&mut conn, &artifact.asset, artifact.look_back())?
    };

    let next = artifact.predict(&closes)?;
    info!(asset = %artifact.asset, next, "predicted next close");
    Ok(next)
}
