//! Database utilities for connections and schema migrations.
//!
//! - [`connection::connect_postgres`] opens a connection from a [`shared_utils::config::DbConfig`].
//! - [`migrate::ensure_schema`] applies the embedded migrations, creating
//!   `crypto_data` and its unique `(coin_id, timestamp)` index when missing.
//!
//! Example:
//! ```no_run
//! use price_store::db::{connection, migrate};
//! use shared_utils::config::DbConfig;
//!
//! let cfg = DbConfig::from_env().expect("db config");
//! migrate::ensure_schema(&cfg).expect("migrations");
//! let _conn = connection::connect_postgres(&cfg).expect("connect");
//! ```
//!
//! Note: building requires the system libpq (e.g., libpq-dev on Debian/Ubuntu).

pub mod connection;
pub mod migrate;
