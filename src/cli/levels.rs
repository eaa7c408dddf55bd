//! Levels command implementation

use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::Config;
use crate::risk::{RiskManager, Side};

#[derive(Args, Debug)]
pub struct LevelsArgs {
    /// Trading symbol
    #[arg(long)]
    pub symbol: String,

    /// Entry price
    #[arg(long)]
    pub entry: Decimal,

    /// Levels for a short trade
    #[arg(long)]
    pub short: bool,

    /// Reward / risk ratio for the take-profit
    #[arg(long, default_value = "2")]
    pub ratio: Decimal,

    /// JSON file of OHLCV bars, oldest first (ATR stops)
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Capital to size the trade against
    #[arg(long)]
    pub capital: Option<Decimal>,
}

#[derive(Debug, Serialize)]
struct LevelsReport {
    symbol: String,
    side: Side,
    entry: Decimal,
    stop_loss: Decimal,
    take_profit: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    position_size: Option<Decimal>,
}

impl LevelsArgs {
    pub fn execute(&self, config: &Config, json: bool) -> anyhow::Result<()> {
        let manager = RiskManager::new(config.risk.clone());
        let side = Side::from_is_long(!self.short);

        let history = self
            .history
            .as_deref()
            .map(super::load_history)
            .transpose()?;

        let stop_loss = manager.calculate_stop_loss(&self.symbol, self.entry, side, history.as_deref());
        let take_profit =
            manager.take_profit_for_stop(&self.symbol, self.entry, stop_loss, side, self.ratio);
        let position_size = self.capital.map(|capital| {
            manager.calculate_position_size(&self.symbol, self.entry, stop_loss, capital, Decimal::ONE)
        });

        let report = LevelsReport {
            symbol: self.symbol.clone(),
            side,
            entry: self.entry,
            stop_loss,
            take_profit,
            position_size,
        };

        if json {
            return super::print_json(&report);
        }

        println!("{} {}:", report.symbol, report.side);
        println!("  Entry:       {}", report.entry);
        println!("  Stop loss:   {}", report.stop_loss.normalize());
        println!("  Take profit: {}", report.take_profit.normalize());
        if let Some(size) = report.position_size {
            println!("  Size:        {}", size.normalize());
        }
        Ok(())
    }
}
