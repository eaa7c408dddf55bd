//! Concurrent access through the shared risk manager

use riskcore::config::RiskConfig;
use riskcore::risk::{SharedRiskManager, Side};
use rust_decimal_macros::dec;
use std::thread;

#[test]
fn test_concurrent_admission_respects_limits() {
    let manager = SharedRiskManager::new(RiskConfig {
        max_open_trades: 3,
        max_risk_total: dec!(1000),
        ..RiskConfig::default()
    });

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let manager = manager.clone();
            thread::spawn(move || {
                let symbol = format!("COIN{i}");
                manager
                    .try_open_position(&symbol, dec!(100), dec!(1), Side::Long, dec!(95), dec!(110))
                    .is_ok()
            })
        })
        .collect();

    let admitted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(admitted, 3);
    assert_eq!(manager.open_count(), 3);
    assert_eq!(manager.total_risk_exposure(), dec!(15));
}

#[test]
fn test_concurrent_register_and_close() {
    let manager = SharedRiskManager::new(RiskConfig {
        max_open_trades: 100,
        max_risk_total: dec!(10000),
        ..RiskConfig::default()
    });

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let manager = manager.clone();
            thread::spawn(move || {
                let symbol = format!("COIN{i}");
                for _ in 0..50 {
                    manager.register_position(&symbol, dec!(100), dec!(2), Side::Short, dec!(103), dec!(90));
                    manager.update_position(&symbol, dec!(99));
                    manager.close_position(&symbol);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(manager.open_count(), 0);
    assert_eq!(manager.total_risk_exposure(), dec!(0));
    assert_eq!(manager.calculate_risk_metrics().risk_utilization, dec!(0));
}

#[test]
fn test_duplicate_symbol_race() {
    let manager = SharedRiskManager::new(RiskConfig {
        max_risk_total: dec!(1000),
        ..RiskConfig::default()
    });

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let manager = manager.clone();
            thread::spawn(move || {
                manager
                    .try_open_position("BTC", dec!(100), dec!(1), Side::Long, dec!(95), dec!(110))
                    .is_ok()
            })
        })
        .collect();

    let admitted = handles.into_iter().filter_map(|h| h.join().ok()).filter(|ok| *ok).count();
    assert_eq!(admitted, 1);
    assert_eq!(manager.total_risk_exposure(), dec!(5));
}
