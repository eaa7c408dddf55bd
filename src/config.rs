//! Configuration types for riskcore

use anyhow::Context;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::risk::RiskError;
use crate::telemetry::LogFormat;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub sizing: SizingConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Risk manager configuration
///
/// Fractions are plain decimals (0.01 = 1%). `max_risk_total` is compared
/// directly against summed position risk amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Fraction of capital risked per trade
    #[serde(default = "default_max_risk_per_trade")]
    pub max_risk_per_trade: Decimal,

    /// Limit on summed risk amounts across open positions
    #[serde(default = "default_max_risk_total")]
    pub max_risk_total: Decimal,

    /// Maximum concurrent positions
    #[serde(default = "default_max_open_trades")]
    pub max_open_trades: usize,

    /// Stop distance from entry when ATR stops are not used
    #[serde(default = "default_stop_loss_pct")]
    pub default_stop_loss_pct: Decimal,

    #[serde(default)]
    pub use_trailing_stop: bool,

    /// Favorable move from entry before the trail engages
    #[serde(default = "default_trailing_stop_activation_pct")]
    pub trailing_stop_activation_pct: Decimal,

    /// Trail distance from the current price
    #[serde(default = "default_trailing_stop_distance_pct")]
    pub trailing_stop_distance_pct: Decimal,

    /// Recognised, not read by the engine
    #[serde(default = "default_target_profit_pct")]
    pub target_profit_pct: Decimal,

    #[serde(default)]
    pub use_atr_for_stops: bool,

    #[serde(default = "default_atr_multiplier")]
    pub atr_multiplier: Decimal,

    /// Bars averaged for ATR
    #[serde(default = "default_atr_period")]
    pub atr_period: usize,

    #[serde(default)]
    pub use_dynamic_position_sizing: bool,

    /// Recognised, not read by the engine
    #[serde(default = "default_portfolio_heat")]
    pub portfolio_heat: Decimal,

    /// Recognised, not read by the engine
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: Decimal,

    /// Recognised, not read by the engine
    #[serde(default = "default_volatility_lookback")]
    pub volatility_lookback: usize,
}

fn default_max_risk_per_trade() -> Decimal {
    Decimal::new(1, 2) // 0.01 = 1%
}
fn default_max_risk_total() -> Decimal {
    Decimal::new(5, 2) // 0.05
}
fn default_max_open_trades() -> usize {
    5
}
fn default_stop_loss_pct() -> Decimal {
    Decimal::new(3, 2) // 0.03 = 3%
}
fn default_trailing_stop_activation_pct() -> Decimal {
    Decimal::new(2, 2) // 0.02 = 2%
}
fn default_trailing_stop_distance_pct() -> Decimal {
    Decimal::new(15, 3) // 0.015 = 1.5%
}
fn default_target_profit_pct() -> Decimal {
    Decimal::new(5, 2) // 0.05 = 5%
}
fn default_atr_multiplier() -> Decimal {
    Decimal::new(2, 0)
}
fn default_atr_period() -> usize {
    14
}
fn default_portfolio_heat() -> Decimal {
    Decimal::new(5, 1) // 0.5
}
fn default_risk_free_rate() -> Decimal {
    Decimal::new(2, 2) // 0.02 = 2%
}
fn default_volatility_lookback() -> usize {
    20
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_risk_per_trade: default_max_risk_per_trade(),
            max_risk_total: default_max_risk_total(),
            max_open_trades: default_max_open_trades(),
            default_stop_loss_pct: default_stop_loss_pct(),
            use_trailing_stop: false,
            trailing_stop_activation_pct: default_trailing_stop_activation_pct(),
            trailing_stop_distance_pct: default_trailing_stop_distance_pct(),
            target_profit_pct: default_target_profit_pct(),
            use_atr_for_stops: false,
            atr_multiplier: default_atr_multiplier(),
            atr_period: default_atr_period(),
            use_dynamic_position_sizing: false,
            portfolio_heat: default_portfolio_heat(),
            risk_free_rate: default_risk_free_rate(),
            volatility_lookback: default_volatility_lookback(),
        }
    }
}

impl RiskConfig {
    /// Reject values the risk manager cannot work with
    pub fn validate(&self) -> Result<(), RiskError> {
        let fractions = [
            ("max_risk_per_trade", self.max_risk_per_trade),
            ("max_risk_total", self.max_risk_total),
            ("default_stop_loss_pct", self.default_stop_loss_pct),
            (
                "trailing_stop_activation_pct",
                self.trailing_stop_activation_pct,
            ),
            ("trailing_stop_distance_pct", self.trailing_stop_distance_pct),
            ("target_profit_pct", self.target_profit_pct),
            ("atr_multiplier", self.atr_multiplier),
            ("portfolio_heat", self.portfolio_heat),
        ];
        if let Some((name, value)) = fractions.iter().find(|(_, v)| v.is_sign_negative()) {
            return Err(RiskError::InvalidConfig(format!(
                "{name} must not be negative, got {value}"
            )));
        }

        if self.atr_period == 0 {
            return Err(RiskError::InvalidConfig("atr_period must be at least 1".into()));
        }
        if self.max_open_trades == 0 {
            return Err(RiskError::InvalidConfig(
                "max_open_trades must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Position sizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingConfig {
    /// Sizing mode: "fixed_risk", "volatility" or "kelly"
    #[serde(default = "default_sizing_mode")]
    pub mode: String,

    /// Maximum position value as a fraction of balance
    #[serde(default = "default_max_position_size")]
    pub max_position_size: Decimal,

    /// Minimum position value as a fraction of balance
    #[serde(default = "default_min_position_size")]
    pub min_position_size: Decimal,

    /// Fraction of balance risked per trade
    #[serde(default = "default_risk_per_trade")]
    pub risk_per_trade: Decimal,

    /// Stop distance used when no stop is supplied (fixed risk)
    #[serde(default = "default_stop_pct")]
    pub default_stop_pct: Decimal,

    /// Returns used for the volatility estimate
    #[serde(default = "default_volatility_lookback")]
    pub volatility_lookback: usize,

    #[serde(default = "default_volatility_factor")]
    pub volatility_factor: Decimal,

    /// Floor on the volatility estimate
    #[serde(default = "default_min_volatility")]
    pub min_volatility: Decimal,

    /// Kelly fraction (0.5 = half Kelly)
    #[serde(default = "default_kelly_fraction")]
    pub kelly_fraction: Decimal,
}

impl SizingConfig {
    /// Reject values the position sizers cannot work with
    pub fn validate(&self) -> Result<(), RiskError> {
        let fractions = [
            ("max_position_size", self.max_position_size),
            ("min_position_size", self.min_position_size),
            ("risk_per_trade", self.risk_per_trade),
            ("default_stop_pct", self.default_stop_pct),
            ("volatility_factor", self.volatility_factor),
            ("kelly_fraction", self.kelly_fraction),
        ];
        if let Some((name, value)) = fractions.iter().find(|(_, v)| v.is_sign_negative()) {
            return Err(RiskError::InvalidConfig(format!(
                "sizing.{name} must not be negative, got {value}"
            )));
        }

        if self.min_volatility <= Decimal::ZERO {
            return Err(RiskError::InvalidConfig(format!(
                "sizing.min_volatility must be positive, got {}",
                self.min_volatility
            )));
        }
        Ok(())
    }
}

fn default_sizing_mode() -> String {
    "fixed_risk".to_string()
}
fn default_max_position_size() -> Decimal {
    Decimal::new(10, 2) // 0.10 = 10%
}
fn default_min_position_size() -> Decimal {
    Decimal::new(1, 2) // 0.01 = 1%
}
fn default_risk_per_trade() -> Decimal {
    Decimal::new(1, 2) // 0.01 = 1%
}
fn default_stop_pct() -> Decimal {
    Decimal::new(5, 2) // 0.05 = 5%
}
fn default_volatility_factor() -> Decimal {
    Decimal::ONE
}
fn default_min_volatility() -> Decimal {
    Decimal::new(5, 3) // 0.005
}
fn default_kelly_fraction() -> Decimal {
    Decimal::new(5, 1) // 0.5 = half Kelly
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            mode: default_sizing_mode(),
            max_position_size: default_max_position_size(),
            min_position_size: default_min_position_size(),
            risk_per_trade: default_risk_per_trade(),
            default_stop_pct: default_stop_pct(),
            volatility_lookback: default_volatility_lookback(),
            volatility_factor: default_volatility_factor(),
            min_volatility: default_min_volatility(),
            kelly_fraction: default_kelly_fraction(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default filter directive, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), RiskError> {
        self.risk.validate()?;
        self.sizing.validate()
    }
}
