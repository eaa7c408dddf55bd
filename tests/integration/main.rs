//! Integration tests for riskcore

mod e2e_test;
mod property_test;
mod shared_test;
mod sizing_test;

use chrono::{Duration, TimeZone, Utc};
use riskcore::model::Candle;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Hourly bars with a flat close and a constant high-low range
pub fn flat_candles(count: usize, close: Decimal, range: Decimal) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            Candle::new(
                start + Duration::hours(i as i64),
                close,
                close + range / dec!(2),
                close - range / dec!(2),
                close,
                dec!(1),
            )
        })
        .collect()
}

/// Hourly bars alternating between two closes
pub fn zigzag_candles(count: usize, low: Decimal, high: Decimal) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let close = if i % 2 == 0 { low } else { high };
            Candle::new(start + Duration::hours(i as i64), close, close, close, close, dec!(1))
        })
        .collect()
}
