//! riskcore: Risk management and position sizing for a retail crypto trading bot
//!
//! This library provides:
//! - Position sizing (fixed risk, volatility-adjusted, Kelly criterion)
//! - Stop-loss and take-profit levels (percentage or ATR based)
//! - Trailing stops that only ratchet toward profit
//! - Portfolio risk exposure tracking and admission control
//! - A mutex-serialized handle for multi-threaded trading loops
//!
//! Exchange connectivity, persistence, and signal generation live with the
//! caller. The engine only consumes already-resolved prices and OHLCV bars.

pub mod cli;
pub mod config;
pub mod model;
pub mod risk;
pub mod telemetry;
