//! Shared helpers for the calculation modules: financial rounding and
//! decimal comparisons.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up
/// rounding (midpoints move away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use itr_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to the nearest whole currency unit, half-up.
///
/// Output figures are legally binding whole-rupee amounts; this is
/// applied exactly once, when a computation result is assembled.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use itr_core::calculations::common::round_rupee;
///
/// assert_eq!(round_rupee(dec!(12500.49)), dec!(12500));
/// assert_eq!(round_rupee(dec!(12500.50)), dec!(12501));
/// assert_eq!(round_rupee(dec!(-99.50)), dec!(-100));
/// ```
pub fn round_rupee(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}
