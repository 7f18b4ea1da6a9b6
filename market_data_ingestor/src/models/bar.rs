//! Canonical in-memory representation of an OHLC price bar.
//!
//! [`OhlcTuple`] is the raw shape returned by the market-data endpoint;
//! [`PriceBar`] is the vendor-agnostic row written to the store. The
//! conversion between them lives in [`crate::normalize`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw `[timestamp_ms, open, high, low, close]` entry from the OHLC endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct OhlcTuple(pub i64, pub f64, pub f64, pub f64, pub f64);

impl OhlcTuple {
    /// Interval timestamp as milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.0
    }

    pub fn open(&self) -> f64 {
        self.1
    }

    pub fn high(&self) -> f64 {
        self.2
    }

    pub fn low(&self) -> f64 {
        self.3
    }

    pub fn close(&self) -> f64 {
        self.4
    }
}

/// A single OHLC bar for one asset at one instant.
///
/// At most one bar per (`symbol`, `timestamp`) pair is kept in the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBar {
    /// Store symbol (e.g., "BTC").
    pub symbol: String,

    /// The timestamp for this bar (UTC).
    pub timestamp: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,
}
