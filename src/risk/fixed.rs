//! Fixed-risk position sizing
//!
//! Risks a fixed fraction of the balance between entry and stop.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use super::sizing::{PositionSizer, SizeLimits, SizingInputs};
use crate::config::SizingConfig;

/// Stop distance used when the caller gives no stop price
pub const DEFAULT_STOP_PCT: Decimal = dec!(0.05);

/// Fixed fractional risk sizer
///
/// ```text
/// risk_amount   = balance * risk_per_trade
/// risk_per_unit = |price - stop|
/// size          = risk_amount / risk_per_unit
/// ```
#[derive(Debug, Clone)]
pub struct FixedRiskSizer {
    /// Shared size bounds
    pub limits: SizeLimits,
    /// Fraction of balance risked per trade (e.g., 0.01 = 1%)
    pub risk_per_trade: Decimal,
    /// Stop distance when no stop is given (e.g., 0.05 = 5%)
    pub default_stop_pct: Decimal,
}

impl FixedRiskSizer {
    /// Create a new fixed-risk sizer
    pub fn new(limits: SizeLimits, risk_per_trade: Decimal) -> Self {
        Self {
            limits,
            risk_per_trade,
            default_stop_pct: DEFAULT_STOP_PCT,
        }
    }

    /// Create from SizingConfig
    pub fn from_config(config: &SizingConfig) -> Self {
        Self {
            limits: SizeLimits::from_config(config),
            risk_per_trade: config.risk_per_trade,
            default_stop_pct: config.default_stop_pct,
        }
    }

    /// Set the fallback stop distance
    pub fn with_default_stop_pct(mut self, default_stop_pct: Decimal) -> Self {
        self.default_stop_pct = default_stop_pct;
        self
    }

    /// Stop implied by the default percentage
    pub fn default_stop(&self, price: Decimal, is_long: bool) -> Decimal {
        if is_long {
            price * (Decimal::ONE - self.default_stop_pct)
        } else {
            price * (Decimal::ONE + self.default_stop_pct)
        }
    }

    /// Calculate position size for an entry and optional stop
    ///
    /// Returns zero when the stop is on the wrong side of the price.
    pub fn size_for_stop(
        &self,
        balance: Decimal,
        price: Decimal,
        stop_price: Option<Decimal>,
        is_long: bool,
    ) -> Decimal {
        if balance <= Decimal::ZERO || price <= Decimal::ZERO {
            warn!(balance = %balance, price = %price, "Invalid balance or price for sizing");
            return Decimal::ZERO;
        }

        let risk_amount = balance * self.risk_per_trade;
        let stop = stop_price.unwrap_or_else(|| self.default_stop(price, is_long));

        let risk_per_unit = if is_long { price - stop } else { stop - price };
        if risk_per_unit <= Decimal::ZERO {
            warn!(
                price = %price,
                stop = %stop,
                is_long,
                "Stop price on wrong side of entry, not sizing"
            );
            return Decimal::ZERO;
        }

        let Some(size) = risk_amount.checked_div(risk_per_unit) else {
            warn!(
                risk_amount = %risk_amount,
                risk_per_unit = %risk_per_unit,
                "Position size overflowed, not sizing"
            );
            return Decimal::ZERO;
        };
        self.limits.validate_position_size(size, balance, price)
    }
}

impl Default for FixedRiskSizer {
    fn default() -> Self {
        Self::from_config(&SizingConfig::default())
    }
}

impl PositionSizer for FixedRiskSizer {
    fn calculate_position_size(
        &self,
        balance: Decimal,
        price: Decimal,
        inputs: &SizingInputs<'_>,
    ) -> Decimal {
        self.size_for_stop(balance, price, inputs.stop_price, inputs.is_long)
    }

    fn mode_name(&self) -> &'static str {
        "fixed_risk"
    }
}
