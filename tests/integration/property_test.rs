//! Property tests for sizing and risk invariants
//!
//! Uses proptest to verify:
//! 1. Size clamping: a non-zero validated size stays within the band
//! 2. Ratchet monotonicity: trailing stops may only tighten
//! 3. Exposure round-trip: registering then closing restores exposure

use proptest::prelude::*;
use riskcore::config::RiskConfig;
use riskcore::risk::{RiskManager, SizeLimits, Side};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// Decimal division rounds at 28 digits
const TOLERANCE: Decimal = dec!(0.000000001);

fn arb_price() -> impl Strategy<Value = Decimal> {
    (100i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_size() -> impl Strategy<Value = Decimal> {
    (1i64..100_000).prop_map(|milli| Decimal::new(milli, 3))
}

fn arb_side() -> impl Strategy<Value = Side> {
    any::<bool>().prop_map(Side::from_is_long)
}

// ── 1. Size clamping ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn validated_size_within_band(
        size in arb_size(),
        balance in (1_000i64..1_000_000).prop_map(Decimal::from),
        price in arb_price(),
    ) {
        let limits = SizeLimits::default();
        let validated = limits.validate_position_size(size, balance, price);
        let fraction = validated * price / balance;

        prop_assert!(fraction <= limits.max_position_size + TOLERANCE);
        prop_assert!(fraction >= limits.min_position_size - TOLERANCE);
    }

    #[test]
    fn zero_size_stays_zero(
        balance in (1_000i64..1_000_000).prop_map(Decimal::from),
        price in arb_price(),
    ) {
        let limits = SizeLimits::default();
        prop_assert_eq!(limits.validate_position_size(Decimal::ZERO, balance, price), Decimal::ZERO);
    }
}

// ── 2. Ratchet monotonicity ──────────────────────────────────────────

proptest! {
    #[test]
    fn trailing_stop_never_loosens(
        side in arb_side(),
        prices in prop::collection::vec(arb_price(), 1..40),
    ) {
        let mut manager = RiskManager::new(RiskConfig {
            use_trailing_stop: true,
            max_risk_total: dec!(1000000000),
            ..RiskConfig::default()
        });
        let entry = dec!(5000);
        let stop = manager.calculate_stop_loss("BTC", entry, side, None);
        manager.register_position("BTC", entry, dec!(1), side, stop, entry);

        let mut last_stop = stop;
        for price in prices {
            let position = manager.update_position("BTC", price).unwrap();
            match side {
                Side::Long => prop_assert!(position.stop_loss >= last_stop),
                Side::Short => prop_assert!(position.stop_loss <= last_stop),
            }
            last_stop = position.stop_loss;
        }
    }
}

// ── 3. Exposure round-trip ───────────────────────────────────────────

proptest! {
    #[test]
    fn exposure_round_trip(
        trades in prop::collection::vec((arb_price(), arb_size(), arb_side()), 1..10),
    ) {
        let mut manager = RiskManager::new(RiskConfig {
            max_open_trades: 100,
            max_risk_total: dec!(1000000000),
            ..RiskConfig::default()
        });

        let mut expected = Decimal::ZERO;
        for (i, (entry, size, side)) in trades.iter().enumerate() {
            let stop = manager.calculate_stop_loss("X", *entry, *side, None);
            let position = manager.register_position(&format!("SYM{i}"), *entry, *size, *side, stop, *entry);
            expected += position.risk_amount;
        }
        prop_assert_eq!(manager.total_risk_exposure(), expected);

        for i in 0..trades.len() {
            let symbol = format!("SYM{i}");
            prop_assert!(manager.close_position(&symbol).is_some());
        }
        prop_assert_eq!(manager.total_risk_exposure(), Decimal::ZERO);
        prop_assert_eq!(manager.open_count(), 0);
    }
}
