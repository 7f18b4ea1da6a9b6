//! Helpers shared by the ingestion and forecasting crates: environment
//! access, database configuration and logging setup.

pub mod config;
pub mod env;
pub mod logging;
