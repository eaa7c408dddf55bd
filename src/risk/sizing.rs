//! Position sizing implementations
//!
//! Provides fixed-risk, volatility-adjusted, and Kelly-based sizing. All
//! variants share the same post-processing step that keeps a position
//! between the configured minimum and maximum fraction of the balance.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use super::fixed::FixedRiskSizer;
use super::kelly::KellySizer;
use super::volatility::VolatilitySizer;
use crate::config::SizingConfig;
use crate::model::Candle;

/// Default cap on position value as a fraction of balance
pub const DEFAULT_MAX_POSITION_SIZE: Decimal = dec!(0.1);
/// Default floor on position value as a fraction of balance
pub const DEFAULT_MIN_POSITION_SIZE: Decimal = dec!(0.01);
/// Default fraction of balance risked per trade
pub const DEFAULT_RISK_PER_TRADE: Decimal = dec!(0.01);

/// Trait for position sizing implementations
pub trait PositionSizer: Send + Sync {
    /// Calculate a quantity for the given balance and price
    ///
    /// Returns zero when the trade should not be taken.
    fn calculate_position_size(
        &self,
        balance: Decimal,
        price: Decimal,
        inputs: &SizingInputs<'_>,
    ) -> Decimal;

    /// Get the sizing mode name
    fn mode_name(&self) -> &'static str;
}

/// Strategy-specific inputs to a sizing call
///
/// Each variant reads only the fields it needs.
#[derive(Debug, Clone, Copy)]
pub struct SizingInputs<'a> {
    /// Explicit stop price (fixed risk)
    pub stop_price: Option<Decimal>,
    /// Trade direction (fixed risk)
    pub is_long: bool,
    /// Recent bars, oldest first (volatility)
    pub price_history: Option<&'a [Candle]>,
    /// Estimated probability of a winning trade (Kelly)
    pub win_probability: Option<Decimal>,
    /// Average win divided by average loss (Kelly)
    pub win_loss_ratio: Option<Decimal>,
}

impl<'a> SizingInputs<'a> {
    /// Inputs for a long trade with no extra context
    pub fn long() -> Self {
        Self {
            stop_price: None,
            is_long: true,
            price_history: None,
            win_probability: None,
            win_loss_ratio: None,
        }
    }

    /// Inputs for a short trade with no extra context
    pub fn short() -> Self {
        Self {
            is_long: false,
            ..Self::long()
        }
    }

    /// Set an explicit stop price
    pub fn with_stop(mut self, stop_price: Decimal) -> Self {
        self.stop_price = Some(stop_price);
        self
    }

    /// Attach price history for volatility estimation
    pub fn with_history(mut self, history: &'a [Candle]) -> Self {
        self.price_history = Some(history);
        self
    }

    /// Set the win probability and win/loss ratio
    pub fn with_edge(mut self, win_probability: Decimal, win_loss_ratio: Decimal) -> Self {
        self.win_probability = Some(win_probability);
        self.win_loss_ratio = Some(win_loss_ratio);
        self
    }
}

impl Default for SizingInputs<'_> {
    fn default() -> Self {
        Self::long()
    }
}

/// Bounds on position value, as fractions of account balance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeLimits {
    /// Maximum position value / balance
    pub max_position_size: Decimal,
    /// Minimum position value / balance for a non-zero trade
    pub min_position_size: Decimal,
}

impl SizeLimits {
    /// Create new size limits
    pub fn new(max_position_size: Decimal, min_position_size: Decimal) -> Self {
        Self {
            max_position_size,
            min_position_size,
        }
    }

    /// Create from SizingConfig
    pub fn from_config(config: &SizingConfig) -> Self {
        Self::new(config.max_position_size, config.min_position_size)
    }

    /// Clamp a raw size into the configured band
    ///
    /// Oversized positions are cut down to the maximum. Undersized but
    /// non-zero positions are raised to the minimum. Zero stays zero, and
    /// so does any size whose value cannot be represented.
    pub fn validate_position_size(&self, size: Decimal, balance: Decimal, price: Decimal) -> Decimal {
        if price <= Decimal::ZERO {
            return size;
        }

        let fraction = if balance > Decimal::ZERO {
            size.checked_mul(price)
                .and_then(|value| value.checked_div(balance))
        } else {
            Some(Decimal::ZERO)
        };
        let Some(fraction) = fraction else {
            warn!(
                size = %size,
                price = %price,
                balance = %balance,
                "Position value overflowed, not sizing"
            );
            return Decimal::ZERO;
        };

        if fraction > self.max_position_size {
            let Some(capped) = fraction_of_balance(self.max_position_size, balance, price) else {
                warn!(balance = %balance, price = %price, "Capped size overflowed, not sizing");
                return Decimal::ZERO;
            };
            debug!(
                size = %size,
                capped = %capped,
                fraction = %fraction,
                "Position size capped at maximum"
            );
            return capped;
        }

        let Some(floor) = fraction_of_balance(self.min_position_size, balance, price) else {
            warn!(balance = %balance, price = %price, "Minimum size overflowed, not sizing");
            return Decimal::ZERO;
        };
        if size < floor && size > Decimal::ZERO {
            debug!(size = %size, floor = %floor, "Position size raised to minimum");
            return floor;
        }

        size
    }
}

/// Quantity worth `fraction * balance` at `price`
fn fraction_of_balance(fraction: Decimal, balance: Decimal, price: Decimal) -> Option<Decimal> {
    fraction.checked_mul(balance)?.checked_div(price)
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POSITION_SIZE, DEFAULT_MIN_POSITION_SIZE)
    }
}

/// Sizing mode selected by configuration key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizingMode {
    #[default]
    FixedRisk,
    Volatility,
    Kelly,
}

impl SizingMode {
    /// Resolve a mode key (case-insensitive)
    ///
    /// Unknown keys fall back to fixed risk.
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "fixed_risk" => SizingMode::FixedRisk,
            "volatility" => SizingMode::Volatility,
            "kelly" => SizingMode::Kelly,
            other => {
                warn!(key = other, "Unknown position sizer type, using fixed_risk");
                SizingMode::FixedRisk
            }
        }
    }

    /// Canonical key for this mode
    pub fn key(self) -> &'static str {
        match self {
            SizingMode::FixedRisk => "fixed_risk",
            SizingMode::Volatility => "volatility",
            SizingMode::Kelly => "kelly",
        }
    }
}

/// A configured position sizer
#[derive(Debug, Clone)]
pub enum Sizer {
    FixedRisk(FixedRiskSizer),
    Volatility(VolatilitySizer),
    Kelly(KellySizer),
}

impl Sizer {
    /// Mode of the wrapped sizer
    pub fn mode(&self) -> SizingMode {
        match self {
            Sizer::FixedRisk(_) => SizingMode::FixedRisk,
            Sizer::Volatility(_) => SizingMode::Volatility,
            Sizer::Kelly(_) => SizingMode::Kelly,
        }
    }

    /// Size limits applied by the wrapped sizer
    pub fn limits(&self) -> &SizeLimits {
        match self {
            Sizer::FixedRisk(s) => &s.limits,
            Sizer::Volatility(s) => &s.limits,
            Sizer::Kelly(s) => &s.limits,
        }
    }
}

impl PositionSizer for Sizer {
    fn calculate_position_size(
        &self,
        balance: Decimal,
        price: Decimal,
        inputs: &SizingInputs<'_>,
    ) -> Decimal {
        match self {
            Sizer::FixedRisk(s) => s.calculate_position_size(balance, price, inputs),
            Sizer::Volatility(s) => s.calculate_position_size(balance, price, inputs),
            Sizer::Kelly(s) => s.calculate_position_size(balance, price, inputs),
        }
    }

    fn mode_name(&self) -> &'static str {
        self.mode().key()
    }
}

impl From<FixedRiskSizer> for Sizer {
    fn from(sizer: FixedRiskSizer) -> Self {
        Sizer::FixedRisk(sizer)
    }
}

impl From<VolatilitySizer> for Sizer {
    fn from(sizer: VolatilitySizer) -> Self {
        Sizer::Volatility(sizer)
    }
}

impl From<KellySizer> for Sizer {
    fn from(sizer: KellySizer) -> Self {
        Sizer::Kelly(sizer)
    }
}

/// Create a position sizer for a mode key
///
/// `fixed_risk`, `volatility`, and `kelly` are recognised; anything else
/// yields a fixed-risk sizer.
pub fn create_sizer(key: &str, config: &SizingConfig) -> Sizer {
    let sizer = match SizingMode::from_key(key) {
        SizingMode::FixedRisk => Sizer::FixedRisk(FixedRiskSizer::from_config(config)),
        SizingMode::Volatility => Sizer::Volatility(VolatilitySizer::from_config(config)),
        SizingMode::Kelly => Sizer::Kelly(KellySizer::from_config(config)),
    };
    debug!(mode = sizer.mode_name(), "Created position sizer");
    sizer
}

/// Create the position sizer named by `config.mode`
pub fn create_sizer_from_config(config: &SizingConfig) -> Sizer {
    create_sizer(&config.mode, config)
}
