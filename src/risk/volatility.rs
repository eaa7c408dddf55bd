//! Volatility-adjusted position sizing
//!
//! Scales size inversely with recent return volatility: the quieter the
//! market, the larger the position for the same risk budget.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use super::sizing::{PositionSizer, SizeLimits, SizingInputs};
use crate::config::SizingConfig;
use crate::model::{return_volatility, Candle};

/// Volatility assumed when history is missing or degenerate
pub const DEFAULT_VOLATILITY: Decimal = dec!(0.02);
/// Volatility floor for extremely quiet markets
pub const MIN_VOLATILITY: Decimal = dec!(0.005);
/// Default number of returns in the volatility window
pub const DEFAULT_VOLATILITY_LOOKBACK: usize = 20;

/// Volatility-adjusted sizer
///
/// ```text
/// size = risk_amount / (price * volatility) * volatility_factor
/// ```
#[derive(Debug, Clone)]
pub struct VolatilitySizer {
    /// Shared size bounds
    pub limits: SizeLimits,
    /// Fraction of balance risked per trade
    pub risk_per_trade: Decimal,
    /// Number of trailing returns used for the estimate
    pub volatility_lookback: usize,
    /// Multiplier applied to the raw size
    pub volatility_factor: Decimal,
    /// Lower bound on the volatility estimate
    pub min_volatility: Decimal,
}

impl VolatilitySizer {
    /// Create a new volatility sizer
    pub fn new(
        limits: SizeLimits,
        risk_per_trade: Decimal,
        volatility_lookback: usize,
        volatility_factor: Decimal,
    ) -> Self {
        Self {
            limits,
            risk_per_trade,
            volatility_lookback,
            volatility_factor,
            min_volatility: MIN_VOLATILITY,
        }
    }

    /// Create from SizingConfig
    pub fn from_config(config: &SizingConfig) -> Self {
        Self {
            limits: SizeLimits::from_config(config),
            risk_per_trade: config.risk_per_trade,
            volatility_lookback: config.volatility_lookback,
            volatility_factor: config.volatility_factor,
            min_volatility: config.min_volatility,
        }
    }

    /// Estimate volatility from price history
    ///
    /// Falls back to [`DEFAULT_VOLATILITY`] and never goes below the
    /// configured floor.
    pub fn estimate_volatility(&self, history: Option<&[Candle]>) -> Decimal {
        let estimate = history
            .and_then(|candles| return_volatility(candles, self.volatility_lookback))
            .and_then(|vol| Decimal::try_from(vol).ok());

        let volatility = match estimate {
            Some(vol) => vol,
            None => {
                debug!(
                    default = %DEFAULT_VOLATILITY,
                    "Insufficient price history, using default volatility"
                );
                DEFAULT_VOLATILITY
            }
        };

        volatility.max(self.min_volatility)
    }

    /// Calculate position size from price history
    pub fn size_for_history(
        &self,
        balance: Decimal,
        price: Decimal,
        history: Option<&[Candle]>,
    ) -> Decimal {
        if balance <= Decimal::ZERO || price <= Decimal::ZERO {
            warn!(balance = %balance, price = %price, "Invalid balance or price for sizing");
            return Decimal::ZERO;
        }

        let volatility = self.estimate_volatility(history);
        if volatility <= Decimal::ZERO {
            warn!(
                volatility = %volatility,
                min_volatility = %self.min_volatility,
                "Non-positive volatility floor, not sizing"
            );
            return Decimal::ZERO;
        }

        let risk_amount = balance * self.risk_per_trade;
        let Some(size) = price
            .checked_mul(volatility)
            .and_then(|unit_risk| risk_amount.checked_div(unit_risk))
            .and_then(|size| size.checked_mul(self.volatility_factor))
        else {
            warn!(
                risk_amount = %risk_amount,
                price = %price,
                volatility = %volatility,
                "Volatility size overflowed, not sizing"
            );
            return Decimal::ZERO;
        };

        debug!(
            volatility = %volatility,
            raw_size = %size,
            "Volatility-adjusted size"
        );

        self.limits.validate_position_size(size, balance, price)
    }
}

impl Default for VolatilitySizer {
    fn default() -> Self {
        Self::from_config(&SizingConfig::default())
    }
}

impl PositionSizer for VolatilitySizer {
    fn calculate_position_size(
        &self,
        balance: Decimal,
        price: Decimal,
        inputs: &SizingInputs<'_>,
    ) -> Decimal {
        self.size_for_history(balance, price, inputs.price_history)
    }

    fn mode_name(&self) -> &'static str {
        "volatility"
    }
}
