#![allow(dead_code)]

use diesel::prelude::*;
use price_store::{
    db::{connection, migrate},
    schema::crypto_data::dsl as cd,
};
use shared_utils::config::DbConfig;

/// Config for the throwaway database named by `TEST_DATABASE_URL`.
pub fn test_db_config() -> DbConfig {
    let url = std::env::var("TEST_DATABASE_URL")
        .expect("set TEST_DATABASE_URL to run the Postgres tests");
    DbConfig::from_lookup(|key| (key == "DATABASE_URL").then(|| url.clone()))
        .expect("db config")
}

/// Migrated connection with every row for `symbols` removed.
pub fn setup_db(symbols: &[&str]) -> (DbConfig, PgConnection) {
    let cfg = test_db_config();
    migrate::ensure_schema(&cfg).expect("migrations");

    let mut conn = connection::connect_postgres(&cfg).expect("connect");
    diesel::delete(cd::crypto_data.filter(cd::coin_id.eq_any(symbols.to_vec())))
        .execute(&mut conn)
        .expect("cleanup");
    (cfg, conn)
}
