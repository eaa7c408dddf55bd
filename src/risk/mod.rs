//! Risk management module
//!
//! Position sizing, stop placement, portfolio limits, and position tracking

mod fixed;
mod kelly;
mod limits;
mod manager;
mod position;
mod shared;
mod sizing;
pub mod stops;
mod types;
mod volatility;

pub use fixed::{FixedRiskSizer, DEFAULT_STOP_PCT};
pub use kelly::{KellySizer, DEFAULT_KELLY_FRACTION, DEFAULT_WIN_LOSS_RATIO, DEFAULT_WIN_PROBABILITY};
pub use limits::PortfolioLimits;
pub use manager::{RiskManager, RiskMetrics, NEUTRAL_VOLATILITY_ADJUSTMENT};
pub use position::{risk_amount_for, ClosedPosition, Position, PositionBook};
pub use shared::SharedRiskManager;
pub use sizing::{
    create_sizer, create_sizer_from_config, PositionSizer, SizeLimits, Sizer, SizingInputs,
    SizingMode, DEFAULT_MAX_POSITION_SIZE, DEFAULT_MIN_POSITION_SIZE, DEFAULT_RISK_PER_TRADE,
};
pub use types::{RiskError, Side};
pub use volatility::{
    VolatilitySizer, DEFAULT_VOLATILITY, DEFAULT_VOLATILITY_LOOKBACK, MIN_VOLATILITY,
};
