//! Decimal money and rate types.
//!
//! All amounts and ratios in the engine are [`rust_decimal::Decimal`]. Floating
//! point cannot hold the balance-sheet identity to the cent across many
//! compounding operations; a 96-bit decimal can.

use crate::types::error::{EngineError, EngineResult};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Monetary amount in the reporting currency.
pub type Money = Decimal;

/// A rate or ratio (0.25 = 25%).
pub type Rate = Decimal;

/// One cent.
pub const CENT: Decimal = dec!(0.01);

/// Tolerance for the accounting identities (assets = liabilities + equity,
/// cash-flow tie).
pub const BALANCE_TOLERANCE: Decimal = CENT;

/// Largest magnitude a reported or projected amount may take.
///
/// Sums, multiples and discounting over a thirty-year horizon stay inside the
/// `Decimal` range for any amount at or below this.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000000);

/// Round to whole cents, midpoint away from zero.
///
/// # Examples
///
/// ```
/// use mna_core::types::round_cents;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_cents(dec!(1.005)), dec!(1.01));
/// assert_eq!(round_cents(dec!(-2.345)), dec!(-2.35));
/// ```
#[inline]
pub fn round_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `|a - b| <= tolerance`.
#[inline]
pub fn within_tolerance(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() <= tolerance
}

/// Ratio that is absent rather than zero when the denominator is zero.
///
/// Used for reported metrics where a missing value must stay visible.
#[inline]
pub fn checked_ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        None
    } else {
        numerator.checked_div(denominator)
    }
}

/// Division that fails with a configuration error instead of dividing by zero.
///
/// `what` names the denominator in the error message.
///
/// # Examples
///
/// ```
/// use mna_core::types::divide;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(divide(dec!(10), dec!(4), "shares").unwrap(), dec!(2.5));
/// assert!(divide(dec!(10), dec!(0), "shares").unwrap_err().is_configuration());
/// ```
pub fn divide(numerator: Decimal, denominator: Decimal, what: &str) -> EngineResult<Decimal> {
    if denominator.is_zero() {
        return Err(EngineError::configuration(format!(
            "{what} is zero; refusing to divide"
        )));
    }
    numerator
        .checked_div(denominator)
        .ok_or_else(|| EngineError::configuration(format!("division by {what} overflowed")))
}
