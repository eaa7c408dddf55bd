//! Size command implementation

use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::Config;
use crate::risk::{create_sizer, PositionSizer, SizingInputs};

#[derive(Args, Debug)]
pub struct SizeArgs {
    /// Account balance
    #[arg(long)]
    pub balance: Decimal,

    /// Entry price
    #[arg(long)]
    pub price: Decimal,

    /// Stop price (fixed risk)
    #[arg(long)]
    pub stop: Option<Decimal>,

    /// Size a short trade
    #[arg(long)]
    pub short: bool,

    /// Win probability (kelly)
    #[arg(long)]
    pub win_prob: Option<Decimal>,

    /// Average win / average loss (kelly)
    #[arg(long)]
    pub win_loss: Option<Decimal>,

    /// JSON file of OHLCV bars, oldest first (volatility)
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Override the configured sizing mode
    #[arg(long)]
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
struct SizeReport {
    mode: &'static str,
    balance: Decimal,
    price: Decimal,
    quantity: Decimal,
    notional: Decimal,
}

impl SizeArgs {
    pub fn execute(&self, config: &Config, json: bool) -> anyhow::Result<()> {
        let mode = self.mode.as_deref().unwrap_or(config.sizing.mode.as_str());
        let sizer = create_sizer(mode, &config.sizing);

        let history = self
            .history
            .as_deref()
            .map(super::load_history)
            .transpose()?;

        let mut inputs = if self.short {
            SizingInputs::short()
        } else {
            SizingInputs::long()
        };
        inputs.stop_price = self.stop;
        inputs.win_probability = self.win_prob;
        inputs.win_loss_ratio = self.win_loss;
        inputs.price_history = history.as_deref();

        let quantity = sizer.calculate_position_size(self.balance, self.price, &inputs);
        let report = SizeReport {
            mode: sizer.mode_name(),
            balance: self.balance,
            price: self.price,
            quantity,
            notional: quantity * self.price,
        };
        tracing::info!(mode = report.mode, quantity = %quantity, "Sized position");

        if json {
            return super::print_json(&report);
        }

        println!("Position size ({}):", report.mode);
        println!("  Balance:  {}", report.balance);
        println!("  Price:    {}", report.price);
        println!("  Quantity: {}", report.quantity.normalize());
        println!("  Notional: {}", report.notional.normalize());
        Ok(())
    }
}
