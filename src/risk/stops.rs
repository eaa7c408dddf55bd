//! Stop-loss, take-profit, and trailing-stop levels
//!
//! Trailing stops follow a ratchet rule: a long's stop may only rise and a
//! short's stop may only fall.

use rust_decimal::Decimal;

use super::Side;

/// Stop a fixed percentage away from entry
pub fn percentage_stop(entry_price: Decimal, side: Side, stop_pct: Decimal) -> Decimal {
    match side {
        Side::Long => entry_price * (Decimal::ONE - stop_pct),
        Side::Short => entry_price * (Decimal::ONE + stop_pct),
    }
}

/// Stop a multiple of ATR away from entry
pub fn atr_stop(entry_price: Decimal, side: Side, atr: Decimal, multiplier: Decimal) -> Decimal {
    let distance = atr * multiplier;
    match side {
        Side::Long => entry_price - distance,
        Side::Short => entry_price + distance,
    }
}

/// Take-profit at `risk_reward_ratio` times the entry-to-stop distance
pub fn take_profit_for_stop(
    entry_price: Decimal,
    stop_loss: Decimal,
    side: Side,
    risk_reward_ratio: Decimal,
) -> Decimal {
    let reward = (entry_price - stop_loss).abs() * risk_reward_ratio;
    match side {
        Side::Long => entry_price + reward,
        Side::Short => entry_price - reward,
    }
}

/// Proposed trailing stop, if the trail has been activated
///
/// A long activates once price reaches `entry * (1 + activation_pct)` and
/// trails `distance_pct` below price. Shorts mirror this.
pub fn trailing_candidate(
    entry_price: Decimal,
    current_price: Decimal,
    side: Side,
    activation_pct: Decimal,
    distance_pct: Decimal,
) -> Option<Decimal> {
    match side {
        Side::Long => {
            let activation = entry_price * (Decimal::ONE + activation_pct);
            (current_price >= activation).then(|| current_price * (Decimal::ONE - distance_pct))
        }
        Side::Short => {
            let activation = entry_price * (Decimal::ONE - activation_pct);
            (current_price <= activation).then(|| current_price * (Decimal::ONE + distance_pct))
        }
    }
}

/// The tighter of the current and proposed stop
pub fn ratchet(side: Side, current_stop: Decimal, proposed: Decimal) -> Decimal {
    match side {
        Side::Long => current_stop.max(proposed),
        Side::Short => current_stop.min(proposed),
    }
}
