//! Postgres persistence for OHLC bars: schema, upsert writer, history reader
//! and the [`sink::PgBarSink`] adapter used by the ingestion loop.

pub mod db;
pub mod models;
pub mod repo;
pub mod schema;
pub mod sink;
