//! PostgreSQL connection helper.

use anyhow::Context;
use diesel::{Connection, PgConnection};
use secrecy::ExposeSecret;
use shared_utils::config::DbConfig;
use tracing::debug;

/// Open a fresh connection. Connections are not pooled; callers hold one for
/// the duration of a single operation and drop it.
pub fn connect_postgres(cfg: &DbConfig) -> anyhow::Result<PgConnection> {
    debug!(target_db = %cfg.describe(), "connecting");
    PgConnection::establish(cfg.connection_string().expose_secret())
        .with_context(|| format!("failed to connect to {}", cfg.describe()))
}
