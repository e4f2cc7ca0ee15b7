//! Descriptive statistics over decimal samples.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;

/// Summary of a sample, used for peer multiples and cross-method dispersion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    /// Number of observations
    pub count: usize,
    /// Arithmetic mean
    pub mean: Decimal,
    /// Median
    pub median: Decimal,
    /// Sample standard deviation (n - 1); zero for a single observation
    pub std_dev: Decimal,
    /// Smallest observation
    pub min: Decimal,
    /// Largest observation
    pub max: Decimal,
    /// 25th percentile (linear interpolation)
    pub p25: Decimal,
    /// 75th percentile (linear interpolation)
    pub p75: Decimal,
}

impl SummaryStatistics {
    /// Summarise `values`. Returns `None` for an empty sample.
    ///
    /// # Examples
    ///
    /// ```
    /// use mna_core::math::statistics::SummaryStatistics;
    /// use rust_decimal_macros::dec;
    ///
    /// let stats = SummaryStatistics::from_values(&[dec!(8), dec!(10), dec!(12), dec!(30)]).unwrap();
    /// assert_eq!(stats.median, dec!(11));
    /// assert_eq!(stats.mean, dec!(15));
    /// ```
    pub fn from_values(values: &[Decimal]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort();

        let mean = mean(&sorted)?;
        Some(Self {
            count: sorted.len(),
            mean,
            median: percentile_sorted(&sorted, Decimal::new(5, 1))?,
            std_dev: sample_std_dev(&sorted, mean)?,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            p25: percentile_sorted(&sorted, Decimal::new(25, 2))?,
            p75: percentile_sorted(&sorted, Decimal::new(75, 2))?,
        })
    }
}

/// Arithmetic mean, `None` for an empty sample.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let total = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))?;
    total.checked_div(Decimal::from(values.len() as u64))
}

/// Median, `None` for an empty sample.
pub fn median(values: &[Decimal]) -> Option<Decimal> {
    let mut sorted = values.to_vec();
    sorted.sort();
    percentile_sorted(&sorted, Decimal::new(5, 1))
}

fn sample_std_dev(values: &[Decimal], mean: Decimal) -> Option<Decimal> {
    if values.len() < 2 {
        return Some(Decimal::ZERO);
    }
    let sum_sq = values.iter().try_fold(Decimal::ZERO, |acc, v| {
        let d = v.checked_sub(mean)?;
        acc.checked_add(d.checked_mul(d)?)
    })?;
    sum_sq
        .checked_div(Decimal::from(values.len() as u64 - 1))?
        .sqrt()
}

/// Percentile of an ascending sample, `p` in [0, 1], linear interpolation
/// between closest ranks.
fn percentile_sorted(sorted: &[Decimal], p: Decimal) -> Option<Decimal> {
    if sorted.is_empty() {
        return None;
    }
    let rank = p * Decimal::from(sorted.len() as u64 - 1);
    let lower = rank.floor();
    let frac = rank - lower;
    let idx = lower.to_usize()?;
    let lo = *sorted.get(idx)?;
    match sorted.get(idx + 1) {
        Some(hi) if !frac.is_zero() => Some(lo + (*hi - lo) * frac),
        _ => Some(lo),
    }
}
