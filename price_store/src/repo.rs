//! Price repository: idempotent upsert and ordered history reads.

use std::str::FromStr;

use anyhow::Context;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDateTime};
use diesel::{
    pg::Pg, prelude::*, query_builder::QueryFragment, query_dsl::methods::ExecuteDsl,
};
use market_data_ingestor::models::bar::PriceBar;
use tracing::debug;

use crate::{
    models::{NewPriceRow, PriceRow},
    schema::crypto_data::{self, dsl as cd},
};

/// Rows per `INSERT` statement. Keeps the bind count well under Postgres'
/// 65535 parameter limit (6 binds per row).
pub const INSERT_CHUNK_ROWS: usize = 1000;

#[derive(thiserror::Error, Debug, PartialEq)]
/// Domain failures raised by the price repository.
pub enum RepoError {
    #[error("non-finite {field} price {value} for {symbol} at {timestamp}")]
    /// NUMERIC has no NaN/inf representation we want in the table.
    NonFinitePrice {
        symbol: String,
        timestamp: DateTime<chrono::Utc>,
        field: &'static str,
        value: f64,
    },

    #[error("stored value {raw:?} is not a finite decimal")]
    /// A NUMERIC value that does not fit an `f64`.
    MalformedDecimal { raw: String },
}

/// Result type used throughout the repository for fallible operations.
pub type RepoResult<T> = anyhow::Result<T>;

/// Storage surface used by the ingestion sink and the forecaster.
pub trait PriceRepo {
    /// Inserts bars whose (symbol, timestamp) key is not yet stored and
    /// returns the number of rows actually inserted. All-or-nothing.
    fn insert_bars(&self, conn: &mut PgConnection, bars: &[PriceBar]) -> RepoResult<usize>;

    /// All complete bars for `symbol`, ascending by timestamp.
    fn load_history(&self, conn: &mut PgConnection, symbol: &str) -> RepoResult<Vec<PriceBar>>;

    /// Close prices for `symbol`, ascending by timestamp.
    fn load_close_series(&self, conn: &mut PgConnection, symbol: &str) -> RepoResult<Vec<f64>>;

    /// The last `n` closes for `symbol`, still in ascending order. Fewer are
    /// returned when the history is shorter.
    fn latest_closes(
        &self,
        conn: &mut PgConnection,
        symbol: &str,
        n: usize,
    ) -> RepoResult<Vec<f64>>;

    /// Number of stored rows for `symbol`.
    fn count_rows(&self, conn: &mut PgConnection, symbol: &str) -> RepoResult<i64>;
}

/// [`PriceRepo`] over the `crypto_data` table.
#[derive(Debug, Default, Clone, Copy)]
pub struct PgPriceRepo;

impl PgPriceRepo {
    pub fn new() -> Self {
        Self
    }
}

/// Converts a bar to its row form, rejecting NaN and infinities.
pub fn to_row(bar: &PriceBar) -> Result<NewPriceRow, RepoError> {
    let dec = |field: &'static str, value: f64| {
        if !value.is_finite() {
            return Err(RepoError::NonFinitePrice {
                symbol: bar.symbol.clone(),
                timestamp: bar.timestamp,
                field,
                value,
            });
        }
        // f64's Display is the shortest round-tripping decimal, never exponent form.
        BigDecimal::from_str(&value.to_string()).map_err(|_| RepoError::MalformedDecimal {
            raw: value.to_string(),
        })
    };

    Ok(NewPriceRow {
        coin_id: bar.symbol.clone(),
        timestamp: bar.timestamp.naive_utc(),
        open: dec("open", bar.open)?,
        high: dec("high", bar.high)?,
        low: dec("low", bar.low)?,
        close: dec("close", bar.close)?,
    })
}

fn to_f64(value: &BigDecimal) -> Result<f64, RepoError> {
    let raw = value.to_string();
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RepoError::MalformedDecimal { raw }),
    }
}

fn to_bar(symbol: &str, row: PriceRow) -> Result<Option<PriceBar>, RepoError> {
    let (Some(ts), Some(open), Some(high), Some(low), Some(close)) =
        (row.timestamp, row.open, row.high, row.low, row.close)
    else {
        return Ok(None);
    };

    Ok(Some(PriceBar {
        symbol: symbol.to_string(),
        timestamp: ts.and_utc(),
        open: to_f64(&open)?,
        high: to_f64(&high)?,
        low: to_f64(&low)?,
        close: to_f64(&close)?,
    }))
}

fn closes(rows: Vec<(Option<NaiveDateTime>, Option<BigDecimal>)>) -> Result<Vec<f64>, RepoError> {
    rows.into_iter()
        .filter_map(|(ts, close)| ts.and(close))
        .map(|c| to_f64(&c))
        .collect()
}

/// The conflict-aware insert for one chunk. Existing keys are left untouched.
pub(crate) fn upsert_statement(
    chunk: &[NewPriceRow],
) -> impl ExecuteDsl<PgConnection> + QueryFragment<Pg> + RunQueryDsl<PgConnection> + '_ {
    diesel::insert_into(crypto_data::table)
        .values(chunk)
        .on_conflict((cd::coin_id, cd::timestamp))
        .do_nothing()
}

impl PriceRepo for PgPriceRepo {
    fn insert_bars(&self, conn: &mut PgConnection, bars: &[PriceBar]) -> RepoResult<usize> {
        if bars.is_empty() {
            return Ok(0);
        }

        let rows = bars.iter().map(to_row).collect::<Result<Vec<_>, _>>()?;

        let inserted = conn.transaction::<_, anyhow::Error, _>(|conn| {
            let mut inserted = 0;
            for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
                inserted += upsert_statement(chunk)
                    .execute(conn)
                    .context("insert into crypto_data")?;
            }
            Ok(inserted)
        })?;

        debug!(
            symbol = %bars[0].symbol,
            offered = bars.len(),
            inserted,
            "upserted bars"
        );
        Ok(inserted)
    }

    fn load_history(&self, conn: &mut PgConnection, symbol: &str) -> RepoResult<Vec<PriceBar>> {
        let rows: Vec<PriceRow> = cd::crypto_data
            .filter(cd::coin_id.eq(symbol))
            .order(cd::timestamp.asc())
            .select(PriceRow::as_select())
            .load(conn)
            .with_context(|| format!("load history for {symbol}"))?;

        let total = rows.len();
        let mut bars = Vec::with_capacity(total);
        for row in rows {
            if let Some(bar) = to_bar(symbol, row)? {
                bars.push(bar);
            }
        }
        if bars.len() < total {
            debug!(symbol, skipped = total - bars.len(), "skipped incomplete rows");
        }
        Ok(bars)
    }

    fn load_close_series(&self, conn: &mut PgConnection, symbol: &str) -> RepoResult<Vec<f64>> {
        let rows = cd::crypto_data
            .filter(cd::coin_id.eq(symbol))
            .filter(cd::timestamp.is_not_null())
            .filter(cd::close.is_not_null())
            .order(cd::timestamp.asc())
            .select((cd::timestamp, cd::close))
            .load::<(Option<NaiveDateTime>, Option<BigDecimal>)>(conn)
            .with_context(|| format!("load closes for {symbol}"))?;

        Ok(closes(rows)?)
    }

    fn latest_closes(
        &self,
        conn: &mut PgConnection,
        symbol: &str,
        n: usize,
    ) -> RepoResult<Vec<f64>> {
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut rows = cd::crypto_data
            .filter(cd::coin_id.eq(symbol))
            .filter(cd::timestamp.is_not_null())
            .filter(cd::close.is_not_null())
            .order(cd::timestamp.desc())
            .limit(i64::try_from(n).unwrap_or(i64::MAX))
            .select((cd::timestamp, cd::close))
            .load::<(Option<NaiveDateTime>, Option<BigDecimal>)>(conn)
            .with_context(|| format!("load latest closes for {symbol}"))?;
        rows.reverse();

        Ok(closes(rows)?)
    }

    fn count_rows(&self, conn: &mut PgConnection, symbol: &str) -> RepoResult<i64> {
        let n = cd::crypto_data
            .filter(cd::coin_id.eq(symbol))
            .count()
            .get_result(conn)?;
        Ok(n)
    }
}
