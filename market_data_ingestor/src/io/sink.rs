use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::bar::PriceBar;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// An error occurred while trying to write the data (e.g., connection or statement failure).
    #[snafu(display("Failed to write data: {message}"))]
    WriteError {
        message: String,
        backtrace: Backtrace,
    },

    /// An error occurred while converting [`PriceBar`]s into the destination format (e.g. a non-finite price for a NUMERIC column).
    #[snafu(display("Data conversion error: {message}"))]
    ConversionError {
        message: String,
        backtrace: Backtrace,
    },
}

#[async_trait]
pub trait DataSink: Send + Sync {
    /// The type of output returned after a successful write operation.
    ///
    /// This makes the trait flexible. For example:
    /// - A file sink might return `Vec<PathBuf>`, the paths to the created files.
    /// - A database sink returns `usize`, the number of rows inserted.
    type Output: Send;

    /// Writes a batch of bars to the destination.
    ///
    /// Writing the same batch twice must not duplicate rows keyed by
    /// (`symbol`, `timestamp`).
    async fn write(&self, bars: &[PriceBar]) -> Result<Self::Output, SinkError>;
}
