//! Ingestion settings, optionally loaded from a TOML file:
//!
//! ```toml
//! vs_currency = "usd"
//! days = 365
//!
//! [[assets]]
//! coin_id = "bitcoin"
//! symbol = "BTC"
//! ```
//!
//! Every key is optional; omitted keys take the defaults of the original
//! fixed run (four assets, `usd`, 365 days).

use std::{collections::HashSet, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    errors::ConfigError,
    models::{
        asset::{Asset, default_assets},
        request_params::Days,
    },
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    pub vs_currency: String,
    pub days: Days,
    pub assets: Vec<Asset>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            vs_currency: "usd".to_string(),
            days: Days::default(),
            assets: default_assets(),
        }
    }
}

impl IngestConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Reads, parses and validates a config file.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks the invariants the ingestion loop relies on: at least one
    /// asset, no blank fields, and unique store symbols.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vs_currency.trim().is_empty() {
            return Err(ConfigError::Invalid("vs_currency cannot be empty".into()));
        }
        if self.assets.is_empty() {
            return Err(ConfigError::Invalid("at least one asset is required".into()));
        }

        let mut seen = HashSet::new();
        for asset in &self.assets {
            if asset.coin_id.trim().is_empty() || asset.symbol.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "asset entries need both coin_id and symbol: {asset:?}"
                )));
            }
            if !seen.insert(asset.symbol.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate symbol {}",
                    asset.symbol
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_file_gives_original_defaults() {
        let cfg = IngestConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, IngestConfig::default());
        assert_eq!(cfg.assets.len(), 4);
        assert_eq!(cfg.assets[0], Asset::new("bitcoin", "BTC"));
        assert_eq!(cfg.days, Days::Count(365));
        assert_eq!(cfg.vs_currency, "usd");
        cfg.validate().unwrap();
    }

    #[test]
    fn file_overrides_assets() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
days = "max"
[[assets]]
coin_id = "cardano"
symbol = "ADA"
"#
        )
        .unwrap();

        let cfg = IngestConfig::load_path(file.path()).unwrap();
        assert_eq!(cfg.days, Days::Max);
        assert_eq!(cfg.assets, vec![Asset::new("cardano", "ADA")]);
        assert_eq!(cfg.vs_currency, "usd");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(IngestConfig::from_toml_str("currency = \"eur\"").is_err());
    }

    #[test]
    fn duplicate_symbols_are_invalid() {
        let cfg = IngestConfig {
            assets: vec![Asset::new("bitcoin", "BTC"), Asset::new("wrapped-bitcoin", "BTC")],
            ..IngestConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(m)) if m.contains("BTC")));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = IngestConfig::load_path("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
