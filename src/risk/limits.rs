//! Portfolio limits and admission control

use rust_decimal::Decimal;

use super::{PositionBook, RiskError};
use crate::config::RiskConfig;

/// Portfolio-wide limits on open positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioLimits {
    /// Maximum concurrent positions
    pub max_open_trades: usize,
    /// Maximum aggregate risk exposure
    pub max_risk_total: Decimal,
}

impl PortfolioLimits {
    /// Create from RiskConfig
    pub fn from_config(config: &RiskConfig) -> Self {
        Self {
            max_open_trades: config.max_open_trades,
            max_risk_total: config.max_risk_total,
        }
    }

    /// Check whether a new position may be opened
    ///
    /// Three gates, all of which must pass: the symbol is not already open,
    /// the open-trade limit is not reached, and the added risk stays within
    /// the total risk limit.
    pub fn check_admission(
        &self,
        book: &PositionBook,
        symbol: &str,
        risk_amount: Decimal,
    ) -> Result<(), RiskError> {
        if book.contains(symbol) {
            return Err(RiskError::DuplicatePosition(symbol.to_string()));
        }

        if book.len() >= self.max_open_trades {
            return Err(RiskError::MaxPositionsReached(self.max_open_trades));
        }

        let current = book.total_risk_exposure();
        let exceeds = current
            .checked_add(risk_amount)
            .map_or(true, |total| total > self.max_risk_total);
        if exceeds {
            return Err(RiskError::MaxExposureReached {
                current,
                requested: risk_amount,
                limit: self.max_risk_total,
            });
        }

        Ok(())
    }
}

impl Default for PortfolioLimits {
    fn default() -> Self {
        Self::from_config(&RiskConfig::default())
    }
}
