//! Unified database configuration.
//!
//! Both pipelines read the same keys:
//!
//! | key | required | meaning |
//! |---|---|---|
//! | `DATABASE_URL` | no | full connection string; when set, the keys below are ignored |
//! | `DBNAME` | yes | database name |
//! | `POSTGRES_USER` | yes | role name |
//! | `POSTGRES_PASSWORD` | yes | role password |
//! | `POSTGRES_HOST` | yes | server host |
//! | `POSTGRES_PORT` | no | server port, defaults to 5432 |

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::env::{MissingEnvVarError, lookup_var};

/// Port used when `POSTGRES_PORT` is not set.
pub const DEFAULT_PG_PORT: u16 = 5432;

/// Errors related to application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable required by the application is not set.
    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVarError),

    /// A variable is set but cannot be used.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Discrete connection parameters for a PostgreSQL server.
#[derive(Debug)]
pub struct PgParams {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: SecretString,
}

/// Where the store lives. Built once at process start and passed by
/// reference to every database operation.
#[derive(Debug)]
pub enum DbConfig {
    /// A complete connection string taken verbatim from `DATABASE_URL`.
    Url(SecretString),
    /// Individual parameters assembled into a libpq keyword/value string.
    Params(PgParams),
}

impl DbConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Ok(url) = lookup_var("DATABASE_URL", &lookup) {
            return Ok(Self::Url(SecretString::from(url)));
        }

        let port = match lookup_var("POSTGRES_PORT", &lookup) {
            Ok(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "POSTGRES_PORT".to_string(),
                message: e.to_string(),
            })?,
            Err(_) => DEFAULT_PG_PORT,
        };

        Ok(Self::Params(PgParams {
            host: lookup_var("POSTGRES_HOST", &lookup)?,
            port,
            dbname: lookup_var("DBNAME", &lookup)?,
            user: lookup_var("POSTGRES_USER", &lookup)?,
            password: SecretString::from(lookup_var("POSTGRES_PASSWORD", &lookup)?),
        }))
    }

    /// Connection string accepted by libpq (and therefore by diesel's
    /// `PgConnection::establish`). Contains the password.
    pub fn connection_string(&self) -> SecretString {
        match self {
            Self::Url(url) => SecretString::from(url.expose_secret().to_string()),
            Self::Params(p) => SecretString::from(format!(
                "host={} port={} dbname={} user={} password={}",
                quote_conninfo(&p.host),
                p.port,
                quote_conninfo(&p.dbname),
                quote_conninfo(&p.user),
                quote_conninfo(p.password.expose_secret()),
            )),
        }
    }

    /// Human-readable target without credentials, for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Url(_) => "DATABASE_URL".to_string(),
            Self::Params(p) => format!("{}@{}:{}/{}", p.user, p.host, p.port, p.dbname),
        }
    }
}

// libpq conninfo values: single-quoted, with `\` and `'` backslash-escaped.
fn quote_conninfo(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        if ch == '\\' || ch == '\'' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn params_are_read_from_canonical_keys() {
        let env = vars(&[
            ("DBNAME", "crypto"),
            ("POSTGRES_USER", "ingest"),
            ("POSTGRES_PASSWORD", "s3cret"),
            ("POSTGRES_HOST", "db.local"),
        ]);
        let cfg = DbConfig::from_lookup(|k| env.get(k).cloned()).unwrap();

        match &cfg {
            DbConfig::Params(p) => {
                assert_eq!(p.dbname, "crypto");
                assert_eq!(p.user, "ingest");
                assert_eq!(p.host, "db.local");
                assert_eq!(p.port, DEFAULT_PG_PORT);
            }
            DbConfig::Url(_) => panic!("expected discrete params"),
        }
        assert_eq!(cfg.describe(), "ingest@db.local:5432/crypto");
        assert_eq!(
            cfg.connection_string().expose_secret(),
            "host='db.local' port=5432 dbname='crypto' user='ingest' password='s3cret'"
        );
    }

    #[test]
    fn lowercase_keys_are_not_accepted() {
        let env = vars(&[
            ("dbname", "crypto"),
            ("postgres_user", "ingest"),
            ("postgres_password", "s3cret"),
            ("postgres_host", "db.local"),
        ]);
        let err = DbConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(MissingEnvVarError(ref k)) if k == "POSTGRES_HOST"));
    }

    #[test]
    fn database_url_overrides_params() {
        let env = vars(&[
            ("DATABASE_URL", "postgres://u:p@h/db"),
            ("DBNAME", "ignored"),
        ]);
        let cfg = DbConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert!(matches!(cfg, DbConfig::Url(_)));
        assert_eq!(cfg.connection_string().expose_secret(), "postgres://u:p@h/db");
        assert_eq!(cfg.describe(), "DATABASE_URL");
    }

    #[test]
    fn invalid_port_is_reported() {
        let env = vars(&[
            ("DBNAME", "crypto"),
            ("POSTGRES_USER", "ingest"),
            ("POSTGRES_PASSWORD", "s3cret"),
            ("POSTGRES_HOST", "db.local"),
            ("POSTGRES_PORT", "not-a-port"),
        ]);
        let err = DbConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "POSTGRES_PORT"));
    }

    #[test]
    fn conninfo_values_are_escaped() {
        assert_eq!(quote_conninfo(r"it's\here"), r"'it\'s\\here'");
        assert_eq!(quote_conninfo(""), "''");
    }

    #[test]
    fn debug_output_redacts_password() {
        let env = vars(&[
            ("DBNAME", "crypto"),
            ("POSTGRES_USER", "ingest"),
            ("POSTGRES_PASSWORD", "s3cret"),
            ("POSTGRES_HOST", "db.local"),
        ]);
        let cfg = DbConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert!(!format!("{cfg:?}").contains("s3cret"));
    }
}
