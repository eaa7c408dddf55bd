//! Volatility estimation module
//!
//! Standard deviation of close-to-close percentage returns

use super::Candle;
use rust_decimal::prelude::ToPrimitive;
use statrs::statistics::Statistics;

/// Close-to-close percentage returns, oldest first
///
/// Pairs with a non-positive or unrepresentable previous close are skipped.
pub fn percentage_returns(candles: &[Candle]) -> Vec<f64> {
    candles
        .windows(2)
        .filter_map(|pair| {
            let prev = pair[0].close.to_f64()?;
            let curr = pair[1].close.to_f64()?;
            if prev > 0.0 {
                Some((curr - prev) / prev)
            } else {
                None
            }
        })
        .collect()
}

/// Sample standard deviation of the trailing `lookback` returns
///
/// Returns None when fewer than two returns are available or the estimate
/// is degenerate (NaN, infinite, or zero).
pub fn return_volatility(candles: &[Candle], lookback: usize) -> Option<f64> {
    let returns = percentage_returns(candles);
    let start = returns.len().saturating_sub(lookback);
    let window = &returns[start..];

    if window.len() < 2 {
        return None;
    }

    let std_dev = window.iter().std_dev();
    if std_dev.is_finite() && std_dev > 0.0 {
        Some(std_dev)
    } else {
        None
    }
}
