//! set up migrations

use anyhow::anyhow;
use diesel::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use shared_utils::config::DbConfig;
use tracing::info;

use crate::db::connection::connect_postgres;

/// Embedded Diesel migrations bundled with this crate.
///
/// Every statement is `IF NOT EXISTS`, so applying them to a database that
/// already has a hand-made `crypto_data` table is safe.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Runs pending migrations on an open connection.
pub fn run_postgres(conn: &mut PgConnection) -> anyhow::Result<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!(e))?;

    if !applied.is_empty() {
        info!(count = applied.len(), "applied migrations");
    }
    Ok(())
}

/// Connects and brings the schema up to date.
pub fn ensure_schema(cfg: &DbConfig) -> anyhow::Result<()> {
    let mut conn = connect_postgres(cfg)?;
    run_postgres(&mut conn)
}
