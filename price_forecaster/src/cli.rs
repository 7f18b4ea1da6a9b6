use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    errors::ForecastError,
    model::{TrainConfig, config::DEFAULT_ARTIFACT_PATH},
};

#[derive(Parser)]
#[command(version, about = "Train and query the close-price LSTM")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train on the stored close history and write the model artifact
    Train(TrainArgs),
    /// Forecast the next close from the latest stored history
    Predict(PredictArgs),
}

#[derive(Args, Debug, Default)]
pub struct TrainArgs {
    /// TOML file with training hyperparameters
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Store symbol to train on
    #[arg(long)]
    pub asset: Option<String>,

    #[arg(long)]
    pub look_back: Option<usize>,

    #[arg(long)]
    pub epochs: Option<usize>,

    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Artifact path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Keep the training windows in sequence order every epoch
    #[arg(long)]
    pub no_shuffle: bool,
}

impl TrainArgs {
    /// Config file (or defaults) with the flags applied on top.
    pub fn resolve(&self) -> Result<TrainConfig, ForecastError> {
        let mut cfg = match &self.config {
            Some(path) => TrainConfig::load_path(path)?,
            None => TrainConfig::default(),
        };

        if let Some(asset) = &self.asset {
            cfg.asset = asset.clone();
        }
        if let Some(k) = self.look_back {
            cfg.look_back = k;
        }
        if let Some(n) = self.epochs {
            cfg.epochs = n;
        }
        if let Some(n) = self.batch_size {
            cfg.batch_size = n;
        }
        if let Some(path) = &self.output {
            cfg.output = path.clone();
        }
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        if self.no_shuffle {
            cfg.shuffle = false;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Artifact written by `train`
    #[arg(short, long, default_value = DEFAULT_ARTIFACT_PATH)]
    pub model: PathBuf,
}
