//! Thread-safe risk manager handle

use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

use super::{risk_amount_for, Position, RiskError, RiskManager, RiskMetrics, Side};
use crate::config::RiskConfig;

/// Cloneable handle sharing one [`RiskManager`] across threads
///
/// Every call takes the lock once, so a check-then-register through
/// [`SharedRiskManager::try_open_position`] cannot interleave with another
/// caller.
#[derive(Debug, Clone, Default)]
pub struct SharedRiskManager {
    inner: Arc<Mutex<RiskManager>>,
}

impl SharedRiskManager {
    /// Create a new shared risk manager
    pub fn new(config: RiskConfig) -> Self {
        Self::from_manager(RiskManager::new(config))
    }

    /// Wrap an existing manager
    pub fn from_manager(manager: RiskManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RiskManager> {
        // State is plain data, a panic mid-update cannot leave it unusable
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("Risk manager lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Run a closure with exclusive access to the manager
    pub fn with<R>(&self, f: impl FnOnce(&mut RiskManager) -> R) -> R {
        f(&mut self.lock())
    }

    /// Admit and register a position in one step
    ///
    /// The position's risk is computed from entry, size and stop before the
    /// admission check.
    pub fn try_open_position(
        &self,
        symbol: &str,
        entry_price: Decimal,
        position_size: Decimal,
        side: Side,
        stop_loss: Decimal,
        take_profit: Decimal,
    ) -> Result<Position, RiskError> {
        let risk_amount = risk_amount_for(entry_price, position_size, stop_loss);
        let mut manager = self.lock();
        manager.check_admission(symbol, risk_amount)?;
        Ok(manager.register_position(
            symbol,
            entry_price,
            position_size,
            side,
            stop_loss,
            take_profit,
        ))
    }

    /// See [`RiskManager::register_position`]
    pub fn register_position(
        &self,
        symbol: &str,
        entry_price: Decimal,
        position_size: Decimal,
        side: Side,
        stop_loss: Decimal,
        take_profit: Decimal,
    ) -> Position {
        self.lock().register_position(
            symbol,
            entry_price,
            position_size,
            side,
            stop_loss,
            take_profit,
        )
    }

    /// See [`RiskManager::update_position`]
    pub fn update_position(&self, symbol: &str, current_price: Decimal) -> Option<Position> {
        self.lock().update_position(symbol, current_price)
    }

    /// See [`RiskManager::close_position`]
    pub fn close_position(&self, symbol: &str) -> Option<Position> {
        self.lock().close_position(symbol)
    }

    /// See [`RiskManager::check_stop_hit`]
    pub fn check_stop_hit(&self, symbol: &str, current_price: Decimal) -> bool {
        self.lock().check_stop_hit(symbol, current_price)
    }

    /// See [`RiskManager::check_take_profit_hit`]
    pub fn check_take_profit_hit(&self, symbol: &str, current_price: Decimal) -> bool {
        self.lock().check_take_profit_hit(symbol, current_price)
    }

    /// See [`RiskManager::can_open_position`]
    pub fn can_open_position(&self, symbol: &str, risk_amount: Decimal) -> bool {
        self.lock().can_open_position(symbol, risk_amount)
    }

    /// Copy of the open position for a symbol
    pub fn position(&self, symbol: &str) -> Option<Position> {
        self.lock().position(symbol).cloned()
    }

    /// See [`RiskManager::open_count`]
    pub fn open_count(&self) -> usize {
        self.lock().open_count()
    }

    /// See [`RiskManager::total_risk_exposure`]
    pub fn total_risk_exposure(&self) -> Decimal {
        self.lock().total_risk_exposure()
    }

    /// See [`RiskManager::calculate_risk_metrics`]
    pub fn calculate_risk_metrics(&self) -> RiskMetrics {
        self.lock().calculate_risk_metrics()
    }
}
