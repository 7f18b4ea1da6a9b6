use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("cannot fit a scaler to an empty series")]
    EmptySeries,

    #[error("series contains a non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    #[error("look_back must be at least 1")]
    InvalidLookBack,

    #[error("insufficient history: {observed} closes, need at least {required}")]
    InsufficientHistory { observed: usize, required: usize },

    #[error("{windows} windows leave nothing to train on after the validation split")]
    EmptyTrainingSet { windows: usize },

    #[error("expected an input of length {expected}, got {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("invalid training config: {0}")]
    InvalidConfig(String),

    #[error("model artifact format {found} is not supported (expected {expected})")]
    UnsupportedFormat { found: u32, expected: u32 },

    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed model artifact {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse training config {path}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
