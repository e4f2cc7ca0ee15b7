//! The common shape of a valuation result.

use mna_core::types::Money;
use mna_model::ModelReference;
use serde::Serialize;
use std::fmt;

/// Valuation methodology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationMethod {
    /// Discounted cash flow
    Dcf,
    /// Leveraged buyout
    Lbo,
    /// Comparable company analysis
    Cca,
    /// Merger accretion/dilution
    Merger,
}

impl ValuationMethod {
    /// All methods in report order.
    pub fn all() -> [Self; 4] {
        [Self::Dcf, Self::Lbo, Self::Cca, Self::Merger]
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dcf => "Discounted Cash Flow",
            Self::Lbo => "Leveraged Buyout",
            Self::Cca => "Comparable Companies",
            Self::Merger => "Merger Accretion/Dilution",
        }
    }

    /// Short label for tables and CSV.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Dcf => "DCF",
            Self::Lbo => "LBO",
            Self::Cca => "CCA",
            Self::Merger => "Merger",
        }
    }
}

impl fmt::Display for ValuationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-share value range produced by one method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    /// Lowest per-share value
    pub low: Money,
    /// Central estimate
    pub mid: Money,
    /// Highest per-share value
    pub high: Money,
}

impl ValueRange {
    /// Range from three values; low and high are reordered if needed.
    pub fn new(low: Money, mid: Money, high: Money) -> Self {
        Self {
            low: low.min(mid).min(high),
            mid,
            high: high.max(mid).max(low),
        }
    }

    /// A range collapsed onto one value.
    pub fn point(value: Money) -> Self {
        Self::new(value, value, value)
    }

    /// `high - low`.
    pub fn width(&self) -> Money {
        self.high - self.low
    }
}

/// Implemented by every valuation result.
pub trait Valuation {
    /// The methodology that produced the result.
    fn method(&self) -> ValuationMethod;

    /// The model the result was computed from.
    fn model(&self) -> &ModelReference;

    /// Per-share range for the summary, when the method yields one.
    fn value_range(&self) -> Option<ValueRange>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_range_orders_bounds() {
        let range = ValueRange::new(dec!(12), dec!(10), dec!(8));
        assert_eq!(range.low, dec!(8));
        assert_eq!(range.high, dec!(12));
        assert_eq!(range.width(), dec!(4));
    }

    #[test]
    fn test_point_range() {
        let range = ValueRange::point(dec!(5));
        assert_eq!(range.width(), dec!(0));
    }

    #[test]
    fn test_method_names() {
        assert_eq!(ValuationMethod::all().len(), 4);
        assert_eq!(format!("{}", ValuationMethod::Lbo), "Leveraged Buyout");
        assert_eq!(ValuationMethod::Cca.code(), "CCA");
    }
}
