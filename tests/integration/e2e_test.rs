//! End-to-end risk manager scenarios

use riskcore::config::{Config, RiskConfig};
use riskcore::risk::{RiskError, RiskManager, Side};
use rust_decimal_macros::dec;

use crate::flat_candles;

fn scenario_manager() -> RiskManager {
    RiskManager::new(RiskConfig {
        max_open_trades: 1,
        max_risk_total: dec!(100),
        ..RiskConfig::default()
    })
}

#[test]
fn test_single_slot_scenario() {
    let mut manager = scenario_manager();

    let side: Side = "buy".parse().unwrap();
    let position = manager.register_position("BTC", dec!(100), dec!(1), side, dec!(95), dec!(110));
    assert_eq!(position.risk_amount, dec!(5));
    assert_eq!(manager.total_risk_exposure(), dec!(5));

    // Only one slot
    assert!(!manager.can_open_position("ETH", dec!(1)));
    assert_eq!(
        manager.check_admission("ETH", dec!(1)),
        Err(RiskError::MaxPositionsReached(1))
    );

    manager.close_position("BTC").unwrap();
    assert_eq!(manager.total_risk_exposure(), dec!(0));
    assert!(manager.can_open_position("ETH", dec!(1)));
}

#[test]
fn test_exposure_round_trip() {
    let mut manager = RiskManager::new(RiskConfig {
        max_risk_total: dec!(1000),
        ..RiskConfig::default()
    });

    manager.register_position("BTC", dec!(100), dec!(2), Side::Long, dec!(95), dec!(120));
    manager.register_position("ETH", dec!(50), dec!(3), Side::Short, dec!(52), dec!(45));
    manager.register_position("SOL", dec!(20), dec!(10), Side::Long, dec!(19.5), dec!(22));
    assert_eq!(manager.total_risk_exposure(), dec!(21));

    for symbol in ["ETH", "BTC", "SOL"] {
        manager.close_position(symbol).unwrap();
    }
    assert_eq!(manager.total_risk_exposure(), dec!(0));
    assert_eq!(manager.open_count(), 0);
}

#[test]
fn test_atr_vs_percentage_stop() {
    let atr_manager = RiskManager::new(RiskConfig {
        use_atr_for_stops: true,
        atr_period: 14,
        atr_multiplier: dec!(2),
        ..RiskConfig::default()
    });
    let pct_manager = RiskManager::default();
    let history = flat_candles(30, dec!(100), dec!(1.5));

    // ATR 1.5 * 2 = 3 below entry
    let atr_stop =
        atr_manager.calculate_stop_loss("BTC", dec!(100), Side::Long, Some(history.as_slice()));
    assert_eq!(atr_stop, dec!(97));

    let pct_stop = pct_manager.calculate_stop_loss("BTC", dec!(200), Side::Long, None);
    assert_eq!(pct_stop, dec!(194));

    // Too little history falls back to the percentage stop
    let short_history = flat_candles(5, dec!(100), dec!(1.5));
    assert_eq!(
        atr_manager.calculate_stop_loss("BTC", dec!(200), Side::Long, Some(short_history.as_slice())),
        dec!(194)
    );
}

#[test]
fn test_trade_lifecycle_with_trailing_stop() {
    let mut manager = RiskManager::new(RiskConfig {
        use_trailing_stop: true,
        max_risk_total: dec!(100),
        ..RiskConfig::default()
    });

    let entry = dec!(100);
    let stop = manager.calculate_stop_loss("BTC", entry, Side::Long, None);
    let take_profit = manager.calculate_take_profit("BTC", entry, Side::Long, dec!(3));
    assert_eq!(stop, dec!(97));
    assert_eq!(take_profit, dec!(109));

    let size = manager.calculate_position_size("BTC", entry, stop, dec!(3000), dec!(1));
    assert_eq!(size, dec!(10));
    let risk = size * (entry - stop);
    assert!(manager.can_open_position("BTC", risk));
    manager.register_position("BTC", entry, size, Side::Long, stop, take_profit);

    let mut last_stop = stop;
    for price in [dec!(101), dec!(103), dec!(102), dec!(106), dec!(104)] {
        let position = manager.update_position("BTC", price).unwrap();
        assert!(position.stop_loss >= last_stop);
        last_stop = position.stop_loss;
    }
    // Highest trigger was 106 -> 106 * 0.985
    assert_eq!(last_stop, dec!(104.41));
    assert!(manager.check_stop_hit("BTC", dec!(104.4)));
    assert!(!manager.check_take_profit_hit("BTC", dec!(104.4)));

    let position = manager.close_position("BTC").unwrap();
    let closed = position.close_at(dec!(104.4), chrono::Utc::now());
    assert_eq!(closed.realized_pnl, dec!(44));
    assert_eq!(manager.total_risk_exposure(), dec!(0));
}

#[test]
fn test_short_trailing_stop_only_falls() {
    let mut manager = RiskManager::new(RiskConfig {
        use_trailing_stop: true,
        max_risk_total: dec!(100),
        ..RiskConfig::default()
    });
    manager.register_position("ETH", dec!(100), dec!(1), Side::Short, dec!(103), dec!(90));

    let mut last_stop = dec!(103);
    for price in [dec!(99), dec!(97), dec!(98), dec!(95), dec!(96)] {
        let position = manager.update_position("ETH", price).unwrap();
        assert!(position.stop_loss <= last_stop);
        last_stop = position.stop_loss;
    }
    // 95 * 1.015
    assert_eq!(last_stop, dec!(96.425));
    assert_eq!(manager.position("ETH").unwrap().min_price, Some(dec!(95)));
}

#[test]
fn test_config_example_loads() {
    let config = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example")).unwrap();
    assert_eq!(config.sizing.mode, "fixed_risk");
    assert!(config.risk.validate().is_ok());
}
