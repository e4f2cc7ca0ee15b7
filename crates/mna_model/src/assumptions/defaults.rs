//! Growth-stage rule table for default assumptions.
//!
//! Used when no external assumption source is available. Growth and margins
//! fade linearly from their year-one value to their final-year value.

use super::AssumptionSet;
use mna_core::types::{EngineError, EngineResult, GrowthStage, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// One row of the rule table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageProfile {
    /// Revenue growth in year one
    pub growth_start: Rate,
    /// Revenue growth in the final year
    pub growth_end: Rate,
    /// Gross margin in year one
    pub gross_margin_start: Rate,
    /// Gross margin in the final year
    pub gross_margin_end: Rate,
    /// Operating margin in year one
    pub operating_margin_start: Rate,
    /// Operating margin in the final year
    pub operating_margin_end: Rate,
    /// Capex to revenue
    pub capex_to_revenue: Rate,
    /// Working capital to revenue
    pub working_capital_to_revenue: Rate,
    /// Effective tax rate
    pub tax_rate: Rate,
    /// Depreciation rate on opening net PP&E
    pub depreciation_rate: Rate,
    /// Target debt-to-equity
    pub target_debt_to_equity: Rate,
    /// Dividend payout ratio
    pub payout_ratio: Rate,
}

/// Rule-table row for `stage`.
pub fn profile(stage: GrowthStage) -> StageProfile {
    match stage {
        GrowthStage::HyperGrowth => StageProfile {
            growth_start: dec!(0.50),
            growth_end: dec!(0.20),
            gross_margin_start: dec!(0.70),
            gross_margin_end: dec!(0.72),
            operating_margin_start: dec!(0.05),
            operating_margin_end: dec!(0.20),
            capex_to_revenue: dec!(0.08),
            working_capital_to_revenue: dec!(0.10),
            tax_rate: dec!(0.21),
            depreciation_rate: dec!(0.15),
            target_debt_to_equity: dec!(0.10),
            payout_ratio: Decimal::ZERO,
        },
        GrowthStage::HighGrowth => StageProfile {
            growth_start: dec!(0.25),
            growth_end: dec!(0.10),
            gross_margin_start: dec!(0.60),
            gross_margin_end: dec!(0.62),
            operating_margin_start: dec!(0.15),
            operating_margin_end: dec!(0.22),
            capex_to_revenue: dec!(0.06),
            working_capital_to_revenue: dec!(0.12),
            tax_rate: dec!(0.21),
            depreciation_rate: dec!(0.12),
            target_debt_to_equity: dec!(0.20),
            payout_ratio: Decimal::ZERO,
        },
        GrowthStage::ModerateGrowth => StageProfile {
            growth_start: dec!(0.10),
            growth_end: dec!(0.05),
            gross_margin_start: dec!(0.45),
            gross_margin_end: dec!(0.45),
            operating_margin_start: dec!(0.15),
            operating_margin_end: dec!(0.17),
            capex_to_revenue: dec!(0.05),
            working_capital_to_revenue: dec!(0.15),
            tax_rate: dec!(0.25),
            depreciation_rate: dec!(0.10),
            target_debt_to_equity: dec!(0.40),
            payout_ratio: dec!(0.20),
        },
        GrowthStage::Mature => StageProfile {
            growth_start: dec!(0.04),
            growth_end: dec!(0.03),
            gross_margin_start: dec!(0.40),
            gross_margin_end: dec!(0.40),
            operating_margin_start: dec!(0.18),
            operating_margin_end: dec!(0.18),
            capex_to_revenue: dec!(0.04),
            working_capital_to_revenue: dec!(0.15),
            tax_rate: dec!(0.25),
            depreciation_rate: dec!(0.10),
            target_debt_to_equity: dec!(0.60),
            payout_ratio: dec!(0.40),
        },
        GrowthStage::Declining => StageProfile {
            growth_start: dec!(-0.03),
            growth_end: dec!(-0.05),
            gross_margin_start: dec!(0.35),
            gross_margin_end: dec!(0.32),
            operating_margin_start: dec!(0.10),
            operating_margin_end: dec!(0.06),
            capex_to_revenue: dec!(0.03),
            working_capital_to_revenue: dec!(0.12),
            tax_rate: dec!(0.25),
            depreciation_rate: dec!(0.10),
            target_debt_to_equity: dec!(0.50),
            payout_ratio: dec!(0.30),
        },
    }
}

/// Default assumptions for `stage` over `horizon` years.
///
/// # Errors
///
/// `Configuration` for a zero horizon.
///
/// # Examples
///
/// ```
/// use mna_core::types::GrowthStage;
/// use mna_model::assumptions::defaults::for_stage;
/// use rust_decimal_macros::dec;
///
/// let set = for_stage(GrowthStage::HighGrowth, 4).unwrap();
/// assert_eq!(set.revenue_growth, vec![dec!(0.25), dec!(0.20), dec!(0.15), dec!(0.10)]);
/// ```
pub fn for_stage(stage: GrowthStage, horizon: usize) -> EngineResult<AssumptionSet> {
    if horizon == 0 {
        return Err(EngineError::configuration("horizon must be at least one year"));
    }
    let p = profile(stage);
    Ok(AssumptionSet {
        revenue_growth: fade(p.growth_start, p.growth_end, horizon),
        gross_margin: fade(p.gross_margin_start, p.gross_margin_end, horizon),
        operating_margin: fade(p.operating_margin_start, p.operating_margin_end, horizon),
        capex_to_revenue: p.capex_to_revenue,
        working_capital_to_revenue: p.working_capital_to_revenue,
        tax_rate: p.tax_rate,
        depreciation_rate: p.depreciation_rate,
        target_debt_to_equity: p.target_debt_to_equity,
        payout_ratio: p.payout_ratio,
        share_change: None,
    })
}

/// Linear path from `start` to `end` over `n` points.
fn fade(start: Rate, end: Rate, n: usize) -> Vec<Rate> {
    if n == 1 {
        return vec![start];
    }
    let step = (end - start) / Decimal::from(n as u64 - 1);
    (0..n)
        .map(|i| start + step * Decimal::from(i as u64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stage_produces_valid_set() {
        for stage in GrowthStage::all() {
            for horizon in [1, 5, 10] {
                let set = for_stage(stage, horizon).unwrap();
                assert!(set.validate(horizon).is_ok(), "{stage} horizon {horizon}");
            }
        }
    }

    #[test]
    fn test_fade_endpoints() {
        let path = fade(dec!(0.50), dec!(0.20), 5);
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], dec!(0.50));
        assert_eq!(path[4], dec!(0.20));
        assert_eq!(path[2], dec!(0.35));
    }

    #[test]
    fn test_single_year_uses_start() {
        let set = for_stage(GrowthStage::Declining, 1).unwrap();
        assert_eq!(set.revenue_growth, vec![dec!(-0.03)]);
    }

    #[test]
    fn test_zero_horizon_rejected() {
        assert!(for_stage(GrowthStage::Mature, 0)
            .unwrap_err()
            .is_configuration());
    }

    #[test]
    fn test_growth_ordering_across_stages() {
        let growth: Vec<_> = GrowthStage::all()
            .iter()
            .map(|s| profile(*s).growth_start)
            .collect();
        assert!(growth.windows(2).all(|w| w[0] > w[1]));
    }
}
