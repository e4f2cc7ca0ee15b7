//! Modelling assumptions consumed by the projector.
//!
//! An [`AssumptionSet`] is a plain data contract. It is produced outside the
//! engine (an analyst, a classifier, a language model) or by the built-in
//! growth-stage rule table in [`defaults`], and validated here before use.

pub mod defaults;

use mna_core::types::{EngineError, EngineResult, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest admissible annual revenue growth.
pub const MIN_GROWTH: Decimal = dec!(-0.95);
/// Highest admissible annual revenue growth.
pub const MAX_GROWTH: Decimal = dec!(5.0);
/// Largest admissible annual share-count change in either direction.
pub const MAX_SHARE_CHANGE: Decimal = dec!(0.5);

/// Per-scenario, per-company projection assumptions.
///
/// Sequences are indexed by projection year (element 0 is year 1) and must
/// cover the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssumptionSet {
    /// Annual revenue growth rates, in [-0.95, 5.0]
    pub revenue_growth: Vec<Rate>,
    /// Gross margin targets
    pub gross_margin: Vec<Rate>,
    /// Operating margin targets
    pub operating_margin: Vec<Rate>,
    /// Capex as a share of revenue
    pub capex_to_revenue: Rate,
    /// Net operating working capital as a share of revenue
    pub working_capital_to_revenue: Rate,
    /// Effective tax rate
    pub tax_rate: Rate,
    /// Depreciation as a share of opening net PP&E
    pub depreciation_rate: Rate,
    /// Target debt-to-equity
    pub target_debt_to_equity: Rate,
    /// Dividends as a share of positive net income
    pub payout_ratio: Rate,
    /// Annual share-count change (buyback negative), in [-0.5, 0.5]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_change: Option<Vec<Rate>>,
}

impl AssumptionSet {
    /// Check every range and that each sequence covers `horizon` years.
    ///
    /// # Errors
    ///
    /// `InvalidAssumption` naming the first offending field.
    pub fn validate(&self, horizon: usize) -> EngineResult<()> {
        check_sequence("revenue_growth", &self.revenue_growth, horizon, MIN_GROWTH, MAX_GROWTH)?;
        check_sequence("gross_margin", &self.gross_margin, horizon, Decimal::ZERO, Decimal::ONE)?;
        check_sequence(
            "operating_margin",
            &self.operating_margin,
            horizon,
            Decimal::ZERO,
            Decimal::ONE,
        )?;
        if let Some(changes) = &self.share_change {
            check_sequence("share_change", changes, horizon, -MAX_SHARE_CHANGE, MAX_SHARE_CHANGE)?;
        }

        for (name, value) in [
            ("capex_to_revenue", self.capex_to_revenue),
            ("working_capital_to_revenue", self.working_capital_to_revenue),
            ("tax_rate", self.tax_rate),
            ("depreciation_rate", self.depreciation_rate),
            ("target_debt_to_equity", self.target_debt_to_equity),
            ("payout_ratio", self.payout_ratio),
        ] {
            check_range(name, value, Decimal::ZERO, Decimal::ONE)?;
        }
        Ok(())
    }

    /// Growth rate for projection year `year` (1-based).
    pub fn growth(&self, year: usize) -> Rate {
        self.revenue_growth[year - 1]
    }

    /// Share-count change for `year` (1-based); zero when no sequence is supplied.
    pub fn share_change(&self, year: usize) -> Rate {
        self.share_change
            .as_ref()
            .map_or(Decimal::ZERO, |changes| changes[year - 1])
    }

    /// Derive the upside or downside variant of this set.
    ///
    /// Growth shifts by the scenario's growth delta and both margin paths by
    /// its margin delta, clamped back into their admissible ranges. Balance
    /// sheet ratios are left untouched. `Scenario::Base` returns a copy.
    pub fn for_scenario(&self, scenario: Scenario) -> AssumptionSet {
        let (growth_delta, margin_delta) = scenario.deltas();
        let shift = |values: &[Rate], delta: Decimal, lo: Decimal, hi: Decimal| -> Vec<Rate> {
            values.iter().map(|v| (*v + delta).clamp(lo, hi)).collect()
        };
        AssumptionSet {
            revenue_growth: shift(&self.revenue_growth, growth_delta, MIN_GROWTH, MAX_GROWTH),
            gross_margin: shift(&self.gross_margin, margin_delta, Decimal::ZERO, Decimal::ONE),
            operating_margin: shift(
                &self.operating_margin,
                margin_delta,
                Decimal::ZERO,
                Decimal::ONE,
            ),
            ..self.clone()
        }
    }
}

fn check_range(field: &str, value: Decimal, lo: Decimal, hi: Decimal) -> EngineResult<()> {
    if value < lo || value > hi {
        return Err(EngineError::invalid_assumption(
            field,
            format!("{value} outside [{lo}, {hi}]"),
        ));
    }
    Ok(())
}

fn check_sequence(
    field: &str,
    values: &[Decimal],
    horizon: usize,
    lo: Decimal,
    hi: Decimal,
) -> EngineResult<()> {
    if values.len() < horizon {
        return Err(EngineError::invalid_assumption(
            field,
            format!("{} values supplied for a {horizon}-year horizon", values.len()),
        ));
    }
    for (i, value) in values.iter().enumerate() {
        check_range(&format!("{field}[{i}]"), *value, lo, hi)?;
    }
    Ok(())
}

/// Assumption scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Assumptions as supplied
    Base,
    /// Faster growth, wider margins
    Upside,
    /// Slower growth, thinner margins
    Downside,
}

impl Scenario {
    /// All scenarios in reporting order.
    pub fn all() -> [Self; 3] {
        [Self::Base, Self::Upside, Self::Downside]
    }

    /// (growth delta, margin delta)
    fn deltas(&self) -> (Decimal, Decimal) {
        match self {
            Scenario::Base => (Decimal::ZERO, Decimal::ZERO),
            Scenario::Upside => (dec!(0.02), dec!(0.01)),
            Scenario::Downside => (dec!(-0.03), dec!(-0.02)),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Base => write!(f, "base"),
            Scenario::Upside => write!(f, "upside"),
            Scenario::Downside => write!(f, "downside"),
        }
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "base" => Ok(Scenario::Base),
            "upside" | "bull" => Ok(Scenario::Upside),
            "downside" | "bear" => Ok(Scenario::Downside),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(horizon: usize) -> AssumptionSet {
        AssumptionSet {
            revenue_growth: vec![dec!(0.10); horizon],
            gross_margin: vec![dec!(0.40); horizon],
            operating_margin: vec![dec!(0.15); horizon],
            capex_to_revenue: dec!(0.05),
            working_capital_to_revenue: dec!(0.10),
            tax_rate: dec!(0.25),
            depreciation_rate: dec!(0.10),
            target_debt_to_equity: dec!(0.30),
            payout_ratio: dec!(0.20),
            share_change: None,
        }
    }

    // ========================================
    // Validation Tests
    // ========================================

    #[test]
    fn test_valid_set_passes() {
        assert!(flat(5).validate(5).is_ok());
        assert!(flat(7).validate(5).is_ok());
    }

    #[test]
    fn test_short_sequence_rejected() {
        let err = flat(3).validate(5).unwrap_err();
        match err {
            EngineError::InvalidAssumption { field, reason } => {
                assert_eq!(field, "revenue_growth");
                assert!(reason.contains("3 values"));
            }
            other => panic!("Expected InvalidAssumption, got {:?}", other),
        }
    }

    #[test]
    fn test_growth_bounds() {
        let mut set = flat(5);
        set.revenue_growth[2] = dec!(-0.96);
        assert!(set.validate(5).unwrap_err().is_invalid_assumption());

        set.revenue_growth[2] = dec!(-0.95);
        assert!(set.validate(5).is_ok());

        set.revenue_growth[2] = dec!(5.01);
        assert!(set.validate(5).is_err());
    }

    #[test]
    fn test_ratio_bounds() {
        let mut set = flat(5);
        set.tax_rate = dec!(1.2);
        let err = set.validate(5).unwrap_err();
        assert!(format!("{}", err).contains("tax_rate"));

        let mut set = flat(5);
        set.payout_ratio = dec!(-0.1);
        assert!(set.validate(5).is_err());
    }

    #[test]
    fn test_share_change_bounds() {
        let mut set = flat(5);
        set.share_change = Some(vec![dec!(-0.02); 5]);
        assert!(set.validate(5).is_ok());
        assert_eq!(set.share_change(3), dec!(-0.02));

        set.share_change = Some(vec![dec!(0.6); 5]);
        assert!(set.validate(5).is_err());

        set.share_change = Some(vec![dec!(0.01); 2]);
        assert!(set.validate(5).is_err());
    }

    // ========================================
    // Scenario Tests
    // ========================================

    #[test]
    fn test_base_scenario_is_identity() {
        let set = flat(5);
        assert_eq!(set.for_scenario(Scenario::Base), set);
    }

    #[test]
    fn test_upside_and_downside_shift_growth_and_margins() {
        let set = flat(5);
        let up = set.for_scenario(Scenario::Upside);
        let down = set.for_scenario(Scenario::Downside);

        assert_eq!(up.revenue_growth[0], dec!(0.12));
        assert_eq!(up.operating_margin[0], dec!(0.16));
        assert_eq!(down.revenue_growth[0], dec!(0.07));
        assert_eq!(down.gross_margin[0], dec!(0.38));
        assert_eq!(down.tax_rate, set.tax_rate);
    }

    #[test]
    fn test_scenario_clamps_into_range() {
        let mut set = flat(5);
        set.operating_margin = vec![dec!(0.01); 5];
        let down = set.for_scenario(Scenario::Downside);
        assert_eq!(down.operating_margin[0], Decimal::ZERO);
        assert!(down.validate(5).is_ok());
    }

    #[test]
    fn test_deserialises_without_share_change() {
        let json = r#"{
            "revenue_growth": ["0.1"], "gross_margin": ["0.4"], "operating_margin": ["0.15"],
            "capex_to_revenue": "0.05", "working_capital_to_revenue": "0.1", "tax_rate": "0.25",
            "depreciation_rate": "0.1", "target_debt_to_equity": "0", "payout_ratio": "0"
        }"#;
        let set: AssumptionSet = serde_json::from_str(json).unwrap();
        assert!(set.share_change.is_none());
        assert!(set.validate(1).is_ok());
    }

    #[test]
    fn test_scenario_parsing() {
        assert_eq!(Scenario::from_str("Upside").unwrap(), Scenario::Upside);
        assert_eq!(Scenario::from_str("bear").unwrap(), Scenario::Downside);
        assert!(Scenario::from_str("sideways").is_err());
    }
}
