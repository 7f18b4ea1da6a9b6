//! On-disk model artifact: the network plus the scaler it was trained with.

use std::{
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use crate::{errors::ForecastError, model::LstmNetwork, scaler::MinMaxScaler, trainer::TrainingReport};

/// Bumped whenever the JSON layout changes incompatibly.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    /// Store symbol the model was trained on.
    pub asset: String,
    pub trained_at: DateTime<Utc>,
    pub scaler: MinMaxScaler,
    pub network: LstmNetwork,
    pub report: TrainingReport,
}

#[derive(Deserialize)]
struct Header {
    format_version: u32,
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ForecastError + '_ {
    move |source| ForecastError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl ModelArtifact {
    pub fn new(
        asset: impl Into<String>,
        scaler: MinMaxScaler,
        network: LstmNetwork,
        report: TrainingReport,
    ) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            asset: asset.into(),
            trained_at: Utc::now(),
            scaler,
            network,
            report,
        }
    }

    pub fn look_back(&self) -> usize {
        self.network.look_back
    }

    /// Writes the artifact next to `path` and renames it into place, so the
    /// previous file stays intact if anything fails midway.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ForecastError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let tmp = NamedTempFile::new_in(&dir).map_err(io_err(path))?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer(&mut writer, self).map_err(|source| ForecastError::Json {
                path: path.to_path_buf(),
                source,
            })?;
            writer.flush().map_err(io_err(path))?;
        }
        tmp.as_file().sync_all().map_err(io_err(path))?;
        tmp.persist(path).map_err(|e| io_err(path)(e.error))?;

        info!(path = %path.display(), asset = %self.asset, "saved model");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ForecastError> {
        let path = path.as_ref();
        let json_err = |source| ForecastError::Json {
            path: path.to_path_buf(),
            source,
        };

        let raw = std::fs::read(path).map_err(io_err(path))?;
        let header: Header = serde_json::from_slice(&raw).map_err(json_err)?;
        if header.format_version != FORMAT_VERSION {
            return Err(ForecastError::UnsupportedFormat {
                found: header.format_version,
                expected: FORMAT_VERSION,
            });
        }
        serde_json::from_slice(&raw).map_err(json_err)
    }

    /// Forecasts the close following `closes`, of which only the last
    /// `look_back` values are used.
    pub fn predict(&self, closes: &[f64]) -> Result<f64, ForecastError> {
        let k = self.look_back();
        if closes.len() < k {
            return Err(ForecastError::InsufficientHistory {
                observed: closes.len(),
                required: k,
            });
        }
        let window = self.scaler.transform(&closes[closes.len() - k..]);
        let scaled = self.network.predict(&window)?;
        Ok(self.scaler.inverse_one(scaled))
    }
}
