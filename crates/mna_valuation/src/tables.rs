//! Lookup tables keyed on the classifier's growth stage and industry.

use mna_core::types::{GrowthStage, Industry, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Base equity beta by industry.
pub fn industry_beta(industry: Industry) -> Decimal {
    match industry {
        Industry::Technology => dec!(1.20),
        Industry::Healthcare => dec!(0.95),
        Industry::FinancialServices => dec!(1.10),
        Industry::Consumer => dec!(0.90),
        Industry::Industrials => dec!(1.05),
        Industry::Energy => dec!(1.15),
        Industry::Utilities => dec!(0.55),
        Industry::RealEstate => dec!(0.85),
        Industry::Telecommunications => dec!(0.80),
        Industry::Other => dec!(1.00),
    }
}

/// Beta multiplier by growth stage.
///
/// High-growth platforms are treated as carrying moats that lower their
/// systematic risk; declining companies carry more.
pub fn stage_beta_multiplier(stage: GrowthStage) -> Decimal {
    match stage {
        GrowthStage::HyperGrowth => dec!(0.85),
        GrowthStage::HighGrowth => dec!(0.90),
        GrowthStage::ModerateGrowth => dec!(1.00),
        GrowthStage::Mature => dec!(1.00),
        GrowthStage::Declining => dec!(1.20),
    }
}

/// Terminal-value inputs by growth stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TerminalAssumptions {
    /// Perpetual growth rate
    pub growth: Rate,
    /// Exit multiple applied to final-year free cash flow
    pub exit_multiple: Decimal,
}

/// Terminal growth and exit multiple for `stage`.
pub fn terminal_assumptions(stage: GrowthStage) -> TerminalAssumptions {
    let (growth, exit_multiple) = match stage {
        GrowthStage::HyperGrowth => (dec!(0.04), dec!(25)),
        GrowthStage::HighGrowth => (dec!(0.035), dec!(20)),
        GrowthStage::ModerateGrowth => (dec!(0.03), dec!(15)),
        GrowthStage::Mature => (dec!(0.025), dec!(12)),
        GrowthStage::Declining => (dec!(0.01), dec!(8)),
    };
    TerminalAssumptions {
        growth,
        exit_multiple,
    }
}

/// Control premium over market capitalisation paid by a financial sponsor.
pub fn control_premium(stage: GrowthStage) -> Rate {
    match stage {
        GrowthStage::HyperGrowth => dec!(0.40),
        GrowthStage::HighGrowth => dec!(0.35),
        GrowthStage::ModerateGrowth => dec!(0.30),
        GrowthStage::Mature => dec!(0.25),
        GrowthStage::Declining => dec!(0.20),
    }
}

/// EV/EBITDA exit multiple for a sponsor's five-year hold.
pub fn lbo_exit_multiple(stage: GrowthStage) -> Decimal {
    match stage {
        GrowthStage::HyperGrowth => dec!(18),
        GrowthStage::HighGrowth => dec!(14),
        GrowthStage::ModerateGrowth => dec!(11),
        GrowthStage::Mature => dec!(9),
        GrowthStage::Declining => dec!(6),
    }
}

/// Exit-multiple adjustment by holding period: +1 turn at three years,
/// -1 turn at seven, none otherwise.
pub fn exit_multiple_adjustment(holding_years: usize) -> Decimal {
    match holding_years {
        3 => Decimal::ONE,
        7 => -Decimal::ONE,
        _ => Decimal::ZERO,
    }
}

/// Industry-average trading multiples (EV/Revenue, EV/EBITDA, P/E).
pub fn industry_multiples(industry: Industry) -> [Decimal; 3] {
    match industry {
        Industry::Technology => [dec!(6.0), dec!(20.0), dec!(30.0)],
        Industry::Healthcare => [dec!(4.0), dec!(15.0), dec!(25.0)],
        Industry::FinancialServices => [dec!(2.5), dec!(10.0), dec!(13.0)],
        Industry::Consumer => [dec!(1.5), dec!(12.0), dec!(20.0)],
        Industry::Industrials => [dec!(1.8), dec!(11.0), dec!(18.0)],
        Industry::Energy => [dec!(1.2), dec!(6.0), dec!(12.0)],
        Industry::Utilities => [dec!(2.5), dec!(10.0), dec!(17.0)],
        Industry::RealEstate => [dec!(8.0), dec!(18.0), dec!(35.0)],
        Industry::Telecommunications => [dec!(2.0), dec!(7.0), dec!(15.0)],
        Industry::Other => [dec!(2.0), dec!(10.0), dec!(18.0)],
    }
}

/// Additive multiple premium (discount when negative) by growth stage.
pub fn stage_multiple_premium(stage: GrowthStage) -> Rate {
    match stage {
        GrowthStage::HyperGrowth => dec!(0.30),
        GrowthStage::HighGrowth => dec!(0.15),
        GrowthStage::ModerateGrowth => Decimal::ZERO,
        GrowthStage::Mature => dec!(-0.10),
        GrowthStage::Declining => dec!(-0.25),
    }
}
