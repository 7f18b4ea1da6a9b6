//! Reshapes raw OHLC tuples into [`PriceBar`] rows.

use chrono::DateTime;
use thiserror::Error;

use crate::models::bar::{OhlcTuple, PriceBar};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("timestamp {millis}ms at row {index} is outside the representable range")]
    TimestampOutOfRange { index: usize, millis: i64 },
}

/// Converts the provider response for `symbol` into one [`PriceBar`] per
/// tuple, preserving order. The first tuple element is read as milliseconds
/// since the Unix epoch (UTC).
pub fn process_market_data(
    symbol: &str,
    data: &[OhlcTuple],
) -> Result<Vec<PriceBar>, NormalizeError> {
    data.iter()
        .enumerate()
        .map(|(index, t)| {
            let timestamp = DateTime::from_timestamp_millis(t.timestamp_millis()).ok_or(
                NormalizeError::TimestampOutOfRange {
                    index,
                    millis: t.timestamp_millis(),
                },
            )?;

            Ok(PriceBar {
                symbol: symbol.to_string(),
                timestamp,
                open: t.open(),
                high: t.high(),
                low: t.low(),
                close: t.close(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn one_row_per_tuple_with_epoch_millis() {
        let data = vec![
            OhlcTuple(1_704_067_200_000, 42_000.5, 42_500.0, 41_800.0, 42_250.25),
            OhlcTuple(1_704_412_800_123, 42_250.25, 44_000.0, 42_100.0, 43_900.0),
        ];

        let bars = process_market_data("BTC", &data).unwrap();

        assert_eq!(bars.len(), data.len());
        for (bar, raw) in bars.iter().zip(&data) {
            assert_eq!(bar.symbol, "BTC");
            assert_eq!(bar.timestamp.timestamp_millis(), raw.0);
            assert_eq!(bar.open, raw.1);
            assert_eq!(bar.high, raw.2);
            assert_eq!(bar.low, raw.3);
            assert_eq!(bar.close, raw.4);
        }
        assert_eq!(
            bars[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(bars[1].timestamp.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(process_market_data("ETH", &[]).unwrap().is_empty());
    }

    #[test]
    fn same_input_same_output() {
        let data = vec![OhlcTuple(0, 1.0, 2.0, 0.5, 1.5)];
        assert_eq!(
            process_market_data("XRP", &data).unwrap(),
            process_market_data("XRP", &data).unwrap()
        );
    }

    #[test]
    fn out_of_range_timestamp_is_an_error() {
        let data = vec![
            OhlcTuple(0, 1.0, 1.0, 1.0, 1.0),
            OhlcTuple(i64::MAX, 1.0, 1.0, 1.0, 1.0),
        ];
        assert_eq!(
            process_market_data("SOL", &data).unwrap_err(),
            NormalizeError::TimestampOutOfRange {
                index: 1,
                millis: i64::MAX
            }
        );
    }
}
