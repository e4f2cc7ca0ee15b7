//! Discounting and net-present-value helpers.
//!
//! Cash-flow vectors are indexed by period: element `t` is received at the
//! end of period `t`, so element 0 is undiscounted. Every function returns
//! `None` where the result is undefined (`1 + rate <= 0`) or the decimal
//! arithmetic overflows.

use super::solvers::NewtonRaphsonSolver;
use crate::types::{Rate, SolverError};
use rust_decimal::Decimal;

/// `(1 + rate)^periods`.
///
/// # Examples
///
/// ```
/// use mna_core::math::cashflows::compound;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(compound(dec!(0.10), 2), Some(dec!(1.21)));
/// ```
pub fn compound(rate: Rate, periods: u32) -> Option<Decimal> {
    let base = Decimal::ONE.checked_add(rate)?;
    let mut acc = Decimal::ONE;
    for _ in 0..periods {
        acc = acc.checked_mul(base)?;
    }
    Some(acc)
}

/// `1 / (1 + rate)^period`.
pub fn discount_factor(rate: Rate, period: u32) -> Option<Decimal> {
    if Decimal::ONE + rate <= Decimal::ZERO {
        return None;
    }
    Decimal::ONE.checked_div(compound(rate, period)?)
}

/// Value today of `amount` received at the end of `period`.
pub fn present_value(amount: Decimal, rate: Rate, period: u32) -> Option<Decimal> {
    amount.checked_mul(discount_factor(rate, period)?)
}

/// Net present value of `flows` at `rate`.
///
/// # Examples
///
/// ```
/// use mna_core::math::cashflows::npv;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(npv(dec!(0), &[dec!(-100), dec!(60), dec!(60)]), Some(dec!(20)));
/// assert_eq!(npv(dec!(-1), &[dec!(-100), dec!(60)]), None);
/// ```
pub fn npv(rate: Rate, flows: &[Decimal]) -> Option<Decimal> {
    if Decimal::ONE + rate <= Decimal::ZERO {
        return None;
    }
    flows.iter().enumerate().try_fold(Decimal::ZERO, |acc, (t, cf)| {
        acc.checked_add(present_value(*cf, rate, t as u32)?)
    })
}

/// Derivative of [`npv`] with respect to `rate`:
/// `Σ -t · CF_t / (1 + rate)^(t + 1)`.
pub fn npv_derivative(rate: Rate, flows: &[Decimal]) -> Option<Decimal> {
    if Decimal::ONE + rate <= Decimal::ZERO {
        return None;
    }
    flows
        .iter()
        .enumerate()
        .skip(1)
        .try_fold(Decimal::ZERO, |acc, (t, cf)| {
            let term = cf
                .checked_mul(Decimal::from(t as u64))?
                .checked_mul(discount_factor(rate, t as u32 + 1)?)?;
            acc.checked_sub(term)
        })
}

/// Internal rate of return of `flows` by Newton-Raphson on [`npv`].
///
/// The iterate must stay inside `[lower, upper]`; leaving it is reported as
/// `SolverError::OutOfBounds` with the solver reset to `guess`.
///
/// # Examples
///
/// ```
/// use mna_core::math::cashflows::irr;
/// use mna_core::math::solvers::NewtonRaphsonSolver;
/// use rust_decimal_macros::dec;
///
/// let solver = NewtonRaphsonSolver::with_defaults();
/// let flows = [dec!(-100), dec!(0), dec!(121)];
/// let rate = irr(&solver, &flows, dec!(0.10), dec!(0), dec!(1)).unwrap();
/// assert!((rate - dec!(0.10)).abs() < dec!(0.000000001));
/// ```
pub fn irr(
    solver: &NewtonRaphsonSolver,
    flows: &[Decimal],
    guess: Rate,
    lower: Rate,
    upper: Rate,
) -> Result<Rate, SolverError> {
    if flows.len() < 2 {
        return Err(SolverError::NumericalInstability {
            message: format!("IRR needs at least two cash flows, got {}", flows.len()),
        });
    }
    solver.find_root_within(
        |r| npv(r, flows),
        |r| npv_derivative(r, flows),
        guess,
        lower,
        upper,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compound_and_discount_are_inverse() {
        let growth = compound(dec!(0.08), 5).unwrap();
        let df = discount_factor(dec!(0.08), 5).unwrap();
        assert!((growth * df - Decimal::ONE).abs() < dec!(0.0000000000001));
    }

    #[test]
    fn test_compound_zero_periods_is_one() {
        assert_eq!(compound(dec!(0.25), 0), Some(Decimal::ONE));
    }

    #[test]
    fn test_discount_factor_undefined_below_minus_one() {
        assert_eq!(discount_factor(dec!(-1), 1), None);
        assert_eq!(discount_factor(dec!(-1.5), 3), None);
    }

    #[test]
    fn test_present_value() {
        let pv = present_value(dec!(110), dec!(0.10), 1).unwrap();
        assert!((pv - dec!(100)).abs() < dec!(0.000000001));
    }

    #[test]
    fn test_npv_known_value() {
        let value = npv(dec!(0.10), &[dec!(-100), dec!(60), dec!(60)]).unwrap();
        assert_eq!(crate::types::round_cents(value), dec!(4.13));
    }

    #[test]
    fn test_npv_derivative_matches_finite_difference() {
        let flows = [dec!(-1000), dec!(300), dec!(400), dec!(500)];
        let r = dec!(0.12);
        let h = dec!(0.0000001);
        let numeric = (npv(r + h, &flows).unwrap() - npv(r - h, &flows).unwrap()) / (h * dec!(2));
        let analytic = npv_derivative(r, &flows).unwrap();
        assert!((numeric - analytic).abs() < dec!(0.0001));
    }

    #[test]
    fn test_irr_zeroes_npv() {
        let solver = NewtonRaphsonSolver::with_defaults();
        let flows = [dec!(-500), dec!(40), dec!(45), dec!(50), dec!(900)];
        let rate = irr(&solver, &flows, dec!(0.10), dec!(0), dec!(1)).unwrap();
        assert!(npv(rate, &flows).unwrap().abs() < dec!(0.000001));
    }

    #[test]
    fn test_irr_outside_bounds_is_reported() {
        let solver = NewtonRaphsonSolver::with_defaults();
        // Losing money: IRR is negative
        let flows = [dec!(-100), dec!(50)];
        let result = irr(&solver, &flows, dec!(0.10), dec!(0), dec!(1));
        assert!(matches!(result, Err(SolverError::OutOfBounds { .. })));
    }

    #[test]
    fn test_irr_needs_two_flows() {
        let solver = NewtonRaphsonSolver::with_defaults();
        assert!(irr(&solver, &[dec!(-1)], dec!(0.1), dec!(0), dec!(1)).is_err());
    }
}
