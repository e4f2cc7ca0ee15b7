//! Football-field summary across valuation methods.

use crate::method::{Valuation, ValuationMethod, ValueRange};
use mna_core::types::{checked_ratio, Money, Rate};
use rust_decimal::Decimal;
use serde::Serialize;

/// One method's per-share range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FootballFieldBar {
    /// Method
    pub method: ValuationMethod,
    /// Per-share range
    pub range: ValueRange,
    /// Mid-point over market price, minus one
    pub upside: Option<Rate>,
}

/// Per-share ranges side by side against the market price.
///
/// Methods without a standalone per-share value (the merger analysis) do
/// not appear.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FootballField {
    /// Market price per share
    pub market_price: Money,
    /// Bars in method order
    pub bars: Vec<FootballFieldBar>,
    /// Lowest value across bars
    pub low: Option<Money>,
    /// Highest value across bars
    pub high: Option<Money>,
    /// Mean of the bars' mid-points
    pub average_mid: Option<Money>,
}

impl FootballField {
    /// Build from completed valuations.
    pub fn from_valuations(market_price: Money, valuations: &[&dyn Valuation]) -> Self {
        let mut bars: Vec<FootballFieldBar> = valuations
            .iter()
            .filter_map(|v| {
                v.value_range().map(|range| FootballFieldBar {
                    method: v.method(),
                    range,
                    upside: checked_ratio(range.mid, market_price).map(|r| r - Decimal::ONE),
                })
            })
            .collect();
        bars.sort_by_key(|b| b.method);

        let low = bars.iter().map(|b| b.range.low).min();
        let high = bars.iter().map(|b| b.range.high).max();
        let mids: Vec<Money> = bars.iter().map(|b| b.range.mid).collect();

        Self {
            market_price,
            bars,
            low,
            high,
            average_mid: mna_core::math::statistics::mean(&mids),
        }
    }

    /// Bar for `method`.
    pub fn bar(&self, method: ValuationMethod) -> Option<&FootballFieldBar> {
        self.bars.iter().find(|b| b.method == method)
    }

    /// Whether the market price sits inside the overall range.
    pub fn contains_market_price(&self) -> bool {
        match (self.low, self.high) {
            (Some(low), Some(high)) => low <= self.market_price && self.market_price <= high,
            _ => false,
        }
    }
}
