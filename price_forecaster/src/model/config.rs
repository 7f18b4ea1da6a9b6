//! Training hyperparameters, optionally read from TOML:
//!
//! ```toml
//! asset = "ETH"
//! look_back = 60
//! epochs = 50
//! hidden_sizes = [64, 32]
//! ```
//!
//! Omitted keys keep the defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ForecastError;

pub const DEFAULT_ARTIFACT_PATH: &str = "lstm_model.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainConfig {
    /// Store symbol whose closes are modelled.
    pub asset: String,
    /// Observations per input window.
    pub look_back: usize,
    pub epochs: usize,
    pub batch_size: usize,
    /// Width of each stacked LSTM layer, bottom first.
    pub hidden_sizes: Vec<usize>,
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    /// Fraction of windows, taken from the end, held out for validation.
    pub validation_split: f64,
    /// Reshuffle the training windows every epoch.
    pub shuffle: bool,
    /// Seeds weight initialisation and shuffling.
    pub seed: u64,
    /// Where the trained artifact is written.
    pub output: PathBuf,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            asset: "BTC".to_string(),
            look_back: 30,
            epochs: 20,
            batch_size: 32,
            hidden_sizes: vec![50, 50],
            learning_rate: 0.001,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            validation_split: 0.2,
            shuffle: true,
            seed: 42,
            output: PathBuf::from(DEFAULT_ARTIFACT_PATH),
        }
    }
}

impl TrainConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn load_path(path: impl AsRef<Path>) -> Result<Self, ForecastError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ForecastError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml_str(&raw).map_err(|source| ForecastError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ForecastError> {
        let invalid = |msg: String| Err(ForecastError::InvalidConfig(msg));

        if self.asset.trim().is_empty() {
            return invalid("asset cannot be empty".into());
        }
        if self.look_back == 0 {
            return Err(ForecastError::InvalidLookBack);
        }
        if self.epochs == 0 || self.batch_size == 0 {
            return invalid("epochs and batch_size must be at least 1".into());
        }
        if self.hidden_sizes.is_empty() || self.hidden_sizes.contains(&0) {
            return invalid(format!("bad hidden_sizes {:?}", self.hidden_sizes));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return invalid(format!("learning_rate must be positive, got {}", self.learning_rate));
        }
        if !(0.0..1.0).contains(&self.beta1) || !(0.0..1.0).contains(&self.beta2) {
            return invalid("beta1 and beta2 must lie in [0, 1)".into());
        }
        if !(self.epsilon > 0.0) {
            return invalid("epsilon must be positive".into());
        }
        if !(0.0..1.0).contains(&self.validation_split) {
            return invalid(format!(
                "validation_split must lie in [0, 1), got {}",
                self.validation_split
            ));
        }
        Ok(())
    }
}
