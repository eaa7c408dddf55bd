//! Position tracking

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

use super::Side;

/// Capital lost if a position of `position_size` is stopped out
///
/// Saturates at `Decimal::MAX` when the product cannot be represented, so
/// such a position can never pass a risk limit.
pub fn risk_amount_for(entry_price: Decimal, position_size: Decimal, stop_loss: Decimal) -> Decimal {
    let distance = (entry_price - stop_loss).abs();
    position_size.abs().checked_mul(distance).unwrap_or_else(|| {
        warn!(
            entry_price = %entry_price,
            position_size = %position_size,
            stop_loss = %stop_loss,
            "Risk amount overflowed, saturating"
        );
        Decimal::MAX
    })
}

/// An open position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Position identifier
    pub id: Uuid,
    /// Traded symbol
    pub symbol: String,
    /// Entry price
    pub entry_price: Decimal,
    /// Quantity held
    pub position_size: Decimal,
    /// Trade side
    pub side: Side,
    /// Current stop-loss level
    pub stop_loss: Decimal,
    /// Take-profit level
    pub take_profit: Decimal,
    /// Capital lost if the stop set at entry is hit
    ///
    /// Fixed at registration; trailing-stop updates do not change it.
    pub risk_amount: Decimal,
    /// Entry timestamp
    pub entry_time: DateTime<Utc>,
    /// Highest price seen (longs only)
    pub max_price: Option<Decimal>,
    /// Lowest price seen (shorts only)
    pub min_price: Option<Decimal>,
}

impl Position {
    /// Create a new position, computing its risk amount
    pub fn new(
        symbol: impl Into<String>,
        entry_price: Decimal,
        position_size: Decimal,
        side: Side,
        stop_loss: Decimal,
        take_profit: Decimal,
        entry_time: DateTime<Utc>,
    ) -> Self {
        let risk_amount = risk_amount_for(entry_price, position_size, stop_loss);
        let (max_price, min_price) = match side {
            Side::Long => (Some(entry_price), None),
            Side::Short => (None, Some(entry_price)),
        };

        Self {
            id: Uuid::new_v4(),
            symbol: symbol.into(),
            entry_price,
            position_size,
            side,
            stop_loss,
            take_profit,
            risk_amount,
            entry_time,
            max_price,
            min_price,
        }
    }

    /// Move the favorable price extreme
    pub(crate) fn record_price(&mut self, price: Decimal) {
        match self.side {
            Side::Long => {
                self.max_price = Some(self.max_price.map_or(price, |max| max.max(price)));
            }
            Side::Short => {
                self.min_price = Some(self.min_price.map_or(price, |min| min.min(price)));
            }
        }
    }

    /// True if the price has reached the stop-loss
    pub fn is_stop_hit(&self, price: Decimal) -> bool {
        match self.side {
            Side::Long => price <= self.stop_loss,
            Side::Short => price >= self.stop_loss,
        }
    }

    /// True if the price has reached the take-profit
    pub fn is_take_profit_hit(&self, price: Decimal) -> bool {
        match self.side {
            Side::Long => price >= self.take_profit,
            Side::Short => price <= self.take_profit,
        }
    }

    /// Mark-to-market P&L at a price
    pub fn unrealized_pnl(&self, price: Decimal) -> Decimal {
        match self.side {
            Side::Long => (price - self.entry_price) * self.position_size,
            Side::Short => (self.entry_price - price) * self.position_size,
        }
    }

    /// Build the exit record handed to the persistence layer
    pub fn close_at(self, exit_price: Decimal, exit_time: DateTime<Utc>) -> ClosedPosition {
        let realized_pnl = self.unrealized_pnl(exit_price);
        ClosedPosition {
            position: self,
            exit_price,
            exit_time,
            realized_pnl,
        }
    }
}

/// A closed position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedPosition {
    /// Original position
    pub position: Position,
    /// Exit price
    pub exit_price: Decimal,
    /// Exit timestamp
    pub exit_time: DateTime<Utc>,
    /// Realized P&L
    pub realized_pnl: Decimal,
}

/// Open positions keyed by symbol, plus their aggregate risk
#[derive(Debug, Clone, Default)]
pub struct PositionBook {
    positions: HashMap<String, Position>,
    total_risk_exposure: Decimal,
}

impl PositionBook {
    /// Create an empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a position, replacing any open position on the same symbol
    ///
    /// Returns the replaced position. Exposure is adjusted for both.
    pub fn insert(&mut self, position: Position) -> Option<Position> {
        let replaced = self.positions.insert(position.symbol.clone(), position);
        self.recompute_exposure();
        replaced
    }

    /// Remove the position for a symbol
    pub fn remove(&mut self, symbol: &str) -> Option<Position> {
        let position = self.positions.remove(symbol)?;
        self.recompute_exposure();
        Some(position)
    }

    fn recompute_exposure(&mut self) {
        self.total_risk_exposure = self
            .positions
            .values()
            .fold(Decimal::ZERO, |total, p| total.saturating_add(p.risk_amount));
    }

    /// Get the open position for a symbol
    pub fn get(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub(crate) fn get_mut(&mut self, symbol: &str) -> Option<&mut Position> {
        self.positions.get_mut(symbol)
    }

    /// True if the symbol has an open position
    pub fn contains(&self, symbol: &str) -> bool {
        self.positions.contains_key(symbol)
    }

    /// Iterate over open positions
    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    /// Get number of open positions
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True if no positions are open
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sum of open positions' risk amounts
    pub fn total_risk_exposure(&self) -> Decimal {
        self.total_risk_exposure
    }
}
