//! Market data model
//!
//! OHLCV bars supplied by the market data collaborator and the volatility
//! statistics derived from them

mod atr;
mod volatility;

pub use atr::{average_true_range, true_range};
pub use volatility::{percentage_returns, return_volatility};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single OHLCV bar
///
/// Column names are lower-case; capitalised headers (`Close`, `High`, ...)
/// are accepted on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar open timestamp
    #[serde(alias = "Timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Open price
    #[serde(alias = "Open")]
    pub open: Decimal,
    /// High price
    #[serde(alias = "High")]
    pub high: Decimal,
    /// Low price
    #[serde(alias = "Low")]
    pub low: Decimal,
    /// Close price
    #[serde(alias = "Close")]
    pub close: Decimal,
    /// Traded volume
    #[serde(alias = "Volume")]
    pub volume: Decimal,
}

impl Candle {
    /// Create a new candle
    pub fn new(
        timestamp: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Intrabar range (high - low)
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }
}
