//! Diesel models mapping to [`crate::schema::crypto_data`].
//!
//! Every column except `id` is nullable in tables created by earlier
//! tooling, so the read model keeps them as `Option`s and the repository
//! drops incomplete rows.

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::schema::crypto_data;

/// A row of `crypto_data` as stored.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crypto_data, check_for_backend(diesel::pg::Pg))]
pub struct PriceRow {
    pub id: i32,
    /// Store symbol (e.g., "BTC"); the column name predates the symbol/coin-id split.
    pub coin_id: Option<String>,
    /// Bar instant in UTC, stored without a zone.
    pub timestamp: Option<NaiveDateTime>,
    pub open: Option<BigDecimal>,
    pub high: Option<BigDecimal>,
    pub low: Option<BigDecimal>,
    pub close: Option<BigDecimal>,
}

/// Insertable form of [`PriceRow`].
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = crypto_data)]
pub struct NewPriceRow {
    pub coin_id: String,
    pub timestamp: NaiveDateTime,
    pub open: BigDecimal,
    pub high: BigDecimal,
    pub low: BigDecimal,
    pub close: BigDecimal,
}
