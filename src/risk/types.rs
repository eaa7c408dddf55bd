//! Risk management types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Position direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Profits when price rises
    #[serde(alias = "buy", alias = "BUY", alias = "Long", alias = "LONG")]
    Long,
    /// Profits when price falls
    #[serde(alias = "sell", alias = "SELL", alias = "Short", alias = "SHORT")]
    Short,
}

impl Side {
    /// Side from a boolean long flag
    pub fn from_is_long(is_long: bool) -> Self {
        if is_long {
            Side::Long
        } else {
            Side::Short
        }
    }

    /// True for long positions
    pub fn is_long(self) -> bool {
        self == Side::Long
    }
}

impl FromStr for Side {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" | "long" => Ok(Side::Long),
            "sell" | "short" => Ok(Side::Short),
            other => Err(RiskError::InvalidSide(other.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
        }
    }
}

/// Risk management errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// Symbol already has an open position
    #[error("Position already open for {0}")]
    DuplicatePosition(String),
    /// Maximum concurrent positions reached
    #[error("Maximum open trades reached ({0})")]
    MaxPositionsReached(usize),
    /// Adding the trade would breach the total risk limit
    #[error("Maximum risk exposure reached: {current} + {requested} > {limit}")]
    MaxExposureReached {
        current: Decimal,
        requested: Decimal,
        limit: Decimal,
    },
    /// Unrecognised side string
    #[error("Invalid side: {0}")]
    InvalidSide(String),
    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RiskError {
    /// Short label used for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            RiskError::DuplicatePosition(_) => "duplicate_position",
            RiskError::MaxPositionsReached(_) => "max_open_trades",
            RiskError::MaxExposureReached { .. } => "max_risk_total",
            RiskError::InvalidSide(_) => "invalid_side",
            RiskError::InvalidConfig(_) => "invalid_config",
        }
    }
}
