//! Portfolio risk manager
//!
//! Owns the open positions, computes stop-loss and take-profit levels,
//! ratchets trailing stops, and gates new positions against portfolio limits.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::limits::PortfolioLimits;
use super::stops;
use super::{Position, PositionBook, RiskError, Side};
use crate::config::RiskConfig;
use crate::model::{average_true_range, Candle};
use crate::telemetry;

/// Volatility scaling applied when dynamic position sizing is enabled
///
/// Constant until a volatility signal is wired in.
pub const NEUTRAL_VOLATILITY_ADJUSTMENT: Decimal = Decimal::ONE;

/// Snapshot of portfolio risk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Sum of open positions' risk amounts
    pub total_risk_exposure: Decimal,
    /// Number of open positions
    pub open_positions_count: usize,
    /// Configured total risk limit
    pub max_risk_allowed: Decimal,
    /// Exposure / limit (0 when the limit is 0)
    pub risk_utilization: Decimal,
}

/// Risk manager for a single portfolio
#[derive(Debug, Clone)]
pub struct RiskManager {
    config: RiskConfig,
    limits: PortfolioLimits,
    book: PositionBook,
}

impl RiskManager {
    /// Create a new risk manager
    pub fn new(config: RiskConfig) -> Self {
        let limits = PortfolioLimits::from_config(&config);
        info!(
            max_risk_per_trade = %config.max_risk_per_trade,
            max_risk_total = %config.max_risk_total,
            max_open_trades = config.max_open_trades,
            use_trailing_stop = config.use_trailing_stop,
            use_atr_for_stops = config.use_atr_for_stops,
            "Risk manager initialized"
        );
        Self {
            config,
            limits,
            book: PositionBook::new(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Calculate position size from entry, stop, and capital
    ///
    /// Risks `capital * max_risk_per_trade * risk_multiplier` between entry
    /// and stop. Returns zero for non-positive prices, capital, or risk, a
    /// zero stop distance, or a size too large to represent.
    pub fn calculate_position_size(
        &self,
        symbol: &str,
        entry_price: Decimal,
        stop_loss: Decimal,
        capital: Decimal,
        risk_multiplier: Decimal,
    ) -> Decimal {
        if entry_price <= Decimal::ZERO || stop_loss <= Decimal::ZERO {
            warn!(
                symbol,
                entry_price = %entry_price,
                stop_loss = %stop_loss,
                "Invalid prices for position sizing"
            );
            return Decimal::ZERO;
        }

        let risk_per_unit = (entry_price - stop_loss).abs();
        if risk_per_unit.is_zero() {
            warn!(symbol, "Entry equals stop, cannot size position");
            return Decimal::ZERO;
        }

        if capital <= Decimal::ZERO {
            warn!(symbol, capital = %capital, "Non-positive capital, not sizing");
            return Decimal::ZERO;
        }

        let risk_amount = capital
            .checked_mul(self.config.max_risk_per_trade)
            .and_then(|amount| amount.checked_mul(risk_multiplier));
        let risk_amount = match risk_amount {
            Some(amount) if amount > Decimal::ZERO => amount,
            _ => {
                warn!(
                    symbol,
                    capital = %capital,
                    risk_multiplier = %risk_multiplier,
                    "Non-positive or unrepresentable risk amount, not sizing"
                );
                return Decimal::ZERO;
            }
        };

        let mut size = risk_amount.checked_div(risk_per_unit);
        if self.config.use_dynamic_position_sizing {
            size = size.and_then(|s| s.checked_mul(self.volatility_adjustment(symbol)));
        }
        let Some(size) = size else {
            warn!(
                symbol,
                risk_amount = %risk_amount,
                risk_per_unit = %risk_per_unit,
                "Position size overflowed, not sizing"
            );
            return Decimal::ZERO;
        };

        debug!(
            symbol,
            risk_amount = %risk_amount,
            risk_per_unit = %risk_per_unit,
            size = %size,
            "Calculated position size"
        );
        size
    }

    /// Volatility scaling for dynamic sizing
    pub fn volatility_adjustment(&self, _symbol: &str) -> Decimal {
        NEUTRAL_VOLATILITY_ADJUSTMENT
    }

    /// Calculate a stop-loss level
    ///
    /// Uses `entry ∓ ATR * atr_multiplier` when ATR stops are enabled and
    /// more than `atr_period` bars are supplied, otherwise
    /// `entry * (1 ∓ default_stop_loss_pct)`.
    pub fn calculate_stop_loss(
        &self,
        symbol: &str,
        entry_price: Decimal,
        side: Side,
        ohlcv: Option<&[Candle]>,
    ) -> Decimal {
        if let Some(stop) = self.atr_stop(symbol, entry_price, side, ohlcv) {
            return stop;
        }

        let stop = stops::percentage_stop(entry_price, side, self.config.default_stop_loss_pct);
        debug!(symbol, side = %side, stop = %stop, "Percentage stop loss");
        stop
    }

    fn atr_stop(
        &self,
        symbol: &str,
        entry_price: Decimal,
        side: Side,
        ohlcv: Option<&[Candle]>,
    ) -> Option<Decimal> {
        if !self.config.use_atr_for_stops {
            return None;
        }

        let candles = ohlcv.filter(|c| c.len() > self.config.atr_period)?;
        let atr = average_true_range(candles, self.config.atr_period)?;
        if atr <= Decimal::ZERO {
            warn!(symbol, atr = %atr, "Degenerate ATR, using percentage stop");
            return None;
        }

        let stop = stops::atr_stop(entry_price, side, atr, self.config.atr_multiplier);
        debug!(symbol, side = %side, atr = %atr, stop = %stop, "ATR stop loss");
        Some(stop)
    }

    /// Calculate a take-profit level
    ///
    /// The risk distance comes from the percentage stop; OHLCV context is not
    /// consulted, so with ATR stops enabled this can differ from the stop
    /// actually registered. Use [`RiskManager::take_profit_for_stop`] to
    /// derive a take-profit from a known stop.
    pub fn calculate_take_profit(
        &self,
        symbol: &str,
        entry_price: Decimal,
        side: Side,
        risk_reward_ratio: Decimal,
    ) -> Decimal {
        let stop = self.calculate_stop_loss(symbol, entry_price, side, None);
        self.take_profit_for_stop(symbol, entry_price, stop, side, risk_reward_ratio)
    }

    /// Take-profit at `risk_reward_ratio` times the distance to `stop_loss`
    pub fn take_profit_for_stop(
        &self,
        symbol: &str,
        entry_price: Decimal,
        stop_loss: Decimal,
        side: Side,
        risk_reward_ratio: Decimal,
    ) -> Decimal {
        let take_profit =
            stops::take_profit_for_stop(entry_price, stop_loss, side, risk_reward_ratio);
        debug!(symbol, side = %side, take_profit = %take_profit, "Take profit");
        take_profit
    }

    /// Ratchet a trailing stop toward the current price
    ///
    /// Returns `current_stop` unchanged if trailing is disabled, the symbol
    /// has no open position, the trail is not yet activated, or the proposed
    /// stop would loosen it.
    pub fn update_trailing_stop(
        &self,
        symbol: &str,
        current_price: Decimal,
        side: Side,
        current_stop: Decimal,
    ) -> Decimal {
        if !self.config.use_trailing_stop {
            return current_stop;
        }

        let Some(position) = self.book.get(symbol) else {
            return current_stop;
        };

        let Some(candidate) = stops::trailing_candidate(
            position.entry_price,
            current_price,
            side,
            self.config.trailing_stop_activation_pct,
            self.config.trailing_stop_distance_pct,
        ) else {
            return current_stop;
        };

        let new_stop = stops::ratchet(side, current_stop, candidate);
        if new_stop != current_stop {
            info!(
                symbol,
                side = %side,
                old_stop = %current_stop,
                new_stop = %new_stop,
                "Trailing stop moved"
            );
        }
        new_stop
    }

    /// Register a filled position
    ///
    /// Re-registering an open symbol replaces the old position.
    pub fn register_position(
        &mut self,
        symbol: &str,
        entry_price: Decimal,
        position_size: Decimal,
        side: Side,
        stop_loss: Decimal,
        take_profit: Decimal,
    ) -> Position {
        let position = Position::new(
            symbol,
            entry_price,
            position_size,
            side,
            stop_loss,
            take_profit,
            Utc::now(),
        );

        if let Some(old) = self.book.insert(position.clone()) {
            warn!(symbol, old_id = %old.id, "Replaced existing open position");
        }

        info!(
            symbol,
            side = %side,
            entry_price = %entry_price,
            size = %position_size,
            stop_loss = %stop_loss,
            take_profit = %take_profit,
            risk_amount = %position.risk_amount,
            total_risk_exposure = %self.book.total_risk_exposure(),
            "Position registered"
        );
        self.publish_metrics();
        position
    }

    /// Record a price tick for a position
    ///
    /// Moves the favorable extreme and the trailing stop. Returns the
    /// updated position, or None for an unknown symbol.
    pub fn update_position(&mut self, symbol: &str, current_price: Decimal) -> Option<Position> {
        let (side, stop) = {
            let position = self.book.get_mut(symbol)?;
            position.record_price(current_price);
            (position.side, position.stop_loss)
        };

        let new_stop = self.update_trailing_stop(symbol, current_price, side, stop);
        let position = self.book.get_mut(symbol)?;
        position.stop_loss = new_stop;
        Some(position.clone())
    }

    /// True if the symbol's stop-loss has been reached
    pub fn check_stop_hit(&self, symbol: &str, current_price: Decimal) -> bool {
        self.book
            .get(symbol)
            .is_some_and(|position| position.is_stop_hit(current_price))
    }

    /// True if the symbol's take-profit has been reached
    pub fn check_take_profit_hit(&self, symbol: &str, current_price: Decimal) -> bool {
        self.book
            .get(symbol)
            .is_some_and(|position| position.is_take_profit_hit(current_price))
    }

    /// Remove a position and release its risk
    pub fn close_position(&mut self, symbol: &str) -> Option<Position> {
        let Some(position) = self.book.remove(symbol) else {
            warn!(symbol, "Attempted to close unknown position");
            return None;
        };

        info!(
            symbol,
            risk_released = %position.risk_amount,
            total_risk_exposure = %self.book.total_risk_exposure(),
            "Position closed"
        );
        self.publish_metrics();
        Some(position)
    }

    /// Check whether a new position may be opened, naming the failed gate
    pub fn check_admission(&self, symbol: &str, risk_amount: Decimal) -> Result<(), RiskError> {
        self.limits.check_admission(&self.book, symbol, risk_amount)
    }

    /// True if a new position with `risk_amount` may be opened
    pub fn can_open_position(&self, symbol: &str, risk_amount: Decimal) -> bool {
        match self.check_admission(symbol, risk_amount) {
            Ok(()) => true,
            Err(err) => {
                warn!(symbol, risk_amount = %risk_amount, reason = %err, "Position rejected");
                telemetry::record_rejection(err.reason());
                false
            }
        }
    }

    /// Snapshot of portfolio risk
    pub fn calculate_risk_metrics(&self) -> RiskMetrics {
        let total_risk_exposure = self.book.total_risk_exposure();
        let max_risk_allowed = self.config.max_risk_total;
        let risk_utilization = if max_risk_allowed.is_zero() {
            Decimal::ZERO
        } else {
            total_risk_exposure
                .checked_div(max_risk_allowed)
                .unwrap_or(Decimal::MAX)
        };

        RiskMetrics {
            total_risk_exposure,
            open_positions_count: self.book.len(),
            max_risk_allowed,
            risk_utilization,
        }
    }

    /// Open position for a symbol
    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.book.get(symbol)
    }

    /// Iterate over open positions
    pub fn open_positions(&self) -> impl Iterator<Item = &Position> {
        self.book.iter()
    }

    /// Get number of open positions
    pub fn open_count(&self) -> usize {
        self.book.len()
    }

    /// Sum of open positions' risk amounts
    pub fn total_risk_exposure(&self) -> Decimal {
        self.book.total_risk_exposure()
    }

    fn publish_metrics(&self) {
        telemetry::publish_risk_metrics(&self.calculate_risk_metrics());
    }
}

impl Default for RiskManager {
    fn default() -> Self {
        Self::new(RiskConfig::default())
    }
}
