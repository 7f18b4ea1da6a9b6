use std::path::PathBuf;

use clap::Args;

use crate::{config::IngestConfig, errors::ConfigError, models::request_params::Days};

/// Flags shared by the binaries that run a full ingestion pass.
#[derive(Args, Debug, Default, Clone)]
pub struct IngestArgs {
    /// TOML file with `vs_currency`, `days` and `[[assets]]`
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the configured history length ("max" or a day count)
    #[arg(long)]
    pub days: Option<Days>,

    /// Override the configured quote currency
    #[arg(long)]
    pub vs_currency: Option<String>,
}

impl IngestArgs {
    /// Loads the config file (or the defaults) and applies the flag overrides.
    pub fn resolve(&self) -> Result<IngestConfig, ConfigError> {
        let mut cfg = match &self.config {
            Some(path) => IngestConfig::load_path(path)?,
            None => IngestConfig::default(),
        };
        if let Some(days) = self.days {
            cfg.days = days;
        }
        if let Some(vs) = &self.vs_currency {
            cfg.vs_currency = vs.to_lowercase();
        }
        cfg.validate()?;
        Ok(cfg)
    }
}
