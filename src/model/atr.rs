//! Average True Range
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|).
//! ATR here is the simple moving average of the last `period` true ranges.

use super::Candle;
use rust_decimal::Decimal;

/// Compute the True Range series from candles.
///
/// TR[0] = high[0] - low[0] (no previous close).
pub fn true_range(candles: &[Candle]) -> Vec<Decimal> {
    let mut tr = Vec::with_capacity(candles.len());

    for (i, candle) in candles.iter().enumerate() {
        let high_low = candle.range();
        let value = match i.checked_sub(1).map(|prev| candles[prev].close) {
            Some(prev_close) => {
                let high_prev = (candle.high - prev_close).abs();
                let low_prev = (candle.low - prev_close).abs();
                high_low.max(high_prev).max(low_prev)
            }
            None => high_low,
        };
        tr.push(value);
    }

    tr
}

/// Average True Range over the most recent `period` bars
///
/// Returns None if there are fewer than `period` candles or period is zero.
pub fn average_true_range(candles: &[Candle], period: usize) -> Option<Decimal> {
    if period == 0 || candles.len() < period {
        return None;
    }

    let tr = true_range(candles);
    let recent = &tr[tr.len() - period..];
    let sum: Decimal = recent.iter().sum();

    Some(sum / Decimal::from(period))
}
