//! Kelly criterion position sizing

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use super::sizing::{PositionSizer, SizeLimits, SizingInputs};
use crate::config::SizingConfig;

/// Win probability assumed when the caller's estimate is outside (0, 1)
pub const DEFAULT_WIN_PROBABILITY: Decimal = dec!(0.5);
/// Win/loss ratio assumed when the caller's estimate is not positive
pub const DEFAULT_WIN_LOSS_RATIO: Decimal = dec!(2.0);
/// Half Kelly
pub const DEFAULT_KELLY_FRACTION: Decimal = dec!(0.5);

/// Kelly criterion sizer
#[derive(Debug, Clone)]
pub struct KellySizer {
    /// Shared size bounds
    pub limits: SizeLimits,
    /// Kelly fraction (e.g., 0.5 for half Kelly)
    pub kelly_fraction: Decimal,
}

impl KellySizer {
    /// Create a new Kelly sizer
    pub fn new(limits: SizeLimits, kelly_fraction: Decimal) -> Self {
        Self {
            limits,
            kelly_fraction,
        }
    }

    /// Create from SizingConfig
    pub fn from_config(config: &SizingConfig) -> Self {
        Self::new(SizeLimits::from_config(config), config.kelly_fraction)
    }

    /// Fraction of balance to allocate
    ///
    /// f* = (p * b - q) / b, scaled by the Kelly fraction. Can be negative
    /// when there is no edge.
    pub fn kelly_percentage(
        &self,
        win_probability: Option<Decimal>,
        win_loss_ratio: Option<Decimal>,
    ) -> Decimal {
        let p = win_probability
            .filter(|p| *p > Decimal::ZERO && *p < Decimal::ONE)
            .unwrap_or(DEFAULT_WIN_PROBABILITY);
        let b = win_loss_ratio
            .filter(|b| *b > Decimal::ZERO)
            .unwrap_or(DEFAULT_WIN_LOSS_RATIO);
        let q = Decimal::ONE - p;

        (p * b - q) / b * self.kelly_fraction
    }

    /// Calculate position size from a win probability and payoff ratio
    pub fn size_for_edge(
        &self,
        balance: Decimal,
        price: Decimal,
        win_probability: Option<Decimal>,
        win_loss_ratio: Option<Decimal>,
    ) -> Decimal {
        if balance <= Decimal::ZERO || price <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let kelly_pct = self.kelly_percentage(win_probability, win_loss_ratio);
        if kelly_pct <= Decimal::ZERO {
            debug!(kelly_pct = %kelly_pct, "No statistical edge, not sizing");
            return Decimal::ZERO;
        }

        let Some(size) = balance
            .checked_mul(kelly_pct)
            .and_then(|allocation| allocation.checked_div(price))
        else {
            warn!(balance = %balance, price = %price, "Kelly size overflowed, not sizing");
            return Decimal::ZERO;
        };
        self.limits.validate_position_size(size, balance, price)
    }
}

impl Default for KellySizer {
    fn default() -> Self {
        Self::from_config(&SizingConfig::default())
    }
}

impl PositionSizer for KellySizer {
    fn calculate_position_size(
        &self,
        balance: Decimal,
        price: Decimal,
        inputs: &SizingInputs<'_>,
    ) -> Decimal {
        self.size_for_edge(balance, price, inputs.win_probability, inputs.win_loss_ratio)
    }

    fn mode_name(&self) -> &'static str {
        "kelly"
    }
}
