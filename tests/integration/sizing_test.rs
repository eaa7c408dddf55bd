//! Position sizer integration tests

use riskcore::config::SizingConfig;
use riskcore::risk::{create_sizer, create_sizer_from_config, PositionSizer, SizingInputs, SizingMode};
use rust_decimal_macros::dec;

use crate::{flat_candles, zigzag_candles};

fn wide_band() -> SizingConfig {
    SizingConfig {
        max_position_size: dec!(1),
        min_position_size: dec!(0.01),
        ..SizingConfig::default()
    }
}

#[test]
fn test_fixed_risk_capped_by_default_limits() {
    let sizer = create_sizer("fixed_risk", &SizingConfig::default());

    // $100 at risk / $5 per unit = 20 units = 20% of balance, capped at 10%
    let inputs = SizingInputs::long().with_stop(dec!(95));
    assert_eq!(sizer.calculate_position_size(dec!(10000), dec!(100), &inputs), dec!(10));
}

#[test]
fn test_fixed_risk_default_stop() {
    let sizer = create_sizer("fixed_risk", &wide_band());

    // Default 5% stop: $100 / $5 = 20 units
    assert_eq!(
        sizer.calculate_position_size(dec!(10000), dec!(100), &SizingInputs::long()),
        dec!(20)
    );
    assert_eq!(
        sizer.calculate_position_size(dec!(10000), dec!(100), &SizingInputs::short()),
        dec!(20)
    );
}

#[test]
fn test_fixed_risk_stop_on_wrong_side() {
    let sizer = create_sizer("fixed_risk", &SizingConfig::default());

    let long = SizingInputs::long().with_stop(dec!(105));
    assert_eq!(sizer.calculate_position_size(dec!(10000), dec!(100), &long), dec!(0));

    let short = SizingInputs::short().with_stop(dec!(95));
    assert_eq!(sizer.calculate_position_size(dec!(10000), dec!(100), &short), dec!(0));

    let at_entry = SizingInputs::long().with_stop(dec!(100));
    assert_eq!(sizer.calculate_position_size(dec!(10000), dec!(100), &at_entry), dec!(0));
}

#[test]
fn test_volatility_default_without_history() {
    let sizer = create_sizer("volatility", &wide_band());

    // $100 / ($100 * 0.02) = 50 units
    assert_eq!(
        sizer.calculate_position_size(dec!(10000), dec!(100), &SizingInputs::long()),
        dec!(50)
    );
}

#[test]
fn test_volatility_shrinks_size_in_choppy_market() {
    let sizer = create_sizer("volatility", &wide_band());
    let choppy = zigzag_candles(30, dec!(100), dec!(110));
    let inputs = SizingInputs::long().with_history(&choppy);

    // Return std dev near 0.1 against the 0.02 default
    let size = sizer.calculate_position_size(dec!(10000), dec!(100), &inputs);
    assert!(size > dec!(1) && size < dec!(50), "size {size}");
}

#[test]
fn test_volatility_flat_history_uses_default() {
    let sizer = create_sizer("volatility", &wide_band());
    let flat = flat_candles(30, dec!(100), dec!(1));
    let inputs = SizingInputs::long().with_history(&flat);

    // Zero return volatility is degenerate
    assert_eq!(sizer.calculate_position_size(dec!(10000), dec!(100), &inputs), dec!(50));
}

#[test]
fn test_kelly_from_config() {
    let config = SizingConfig {
        mode: "Kelly".to_string(),
        max_position_size: dec!(0.2),
        ..SizingConfig::default()
    };
    let sizer = create_sizer_from_config(&config);
    assert_eq!(sizer.mode(), SizingMode::Kelly);

    let inputs = SizingInputs::long().with_edge(dec!(0.6), dec!(2));
    assert_eq!(sizer.calculate_position_size(dec!(10000), dec!(100), &inputs), dec!(20));

    let no_edge = SizingInputs::long().with_edge(dec!(0.4), dec!(1));
    assert_eq!(sizer.calculate_position_size(dec!(10000), dec!(100), &no_edge), dec!(0));
}

#[test]
fn test_unknown_mode_falls_back_to_fixed_risk() {
    let sizer = create_sizer("martingale", &SizingConfig::default());
    assert_eq!(sizer.mode_name(), "fixed_risk");
}

#[test]
fn test_invalid_balance_or_price() {
    for key in ["fixed_risk", "volatility", "kelly"] {
        let sizer = create_sizer(key, &SizingConfig::default());
        let inputs = SizingInputs::long();
        assert_eq!(sizer.calculate_position_size(dec!(0), dec!(100), &inputs), dec!(0));
        assert_eq!(sizer.calculate_position_size(dec!(10000), dec!(-1), &inputs), dec!(0));
    }
}
