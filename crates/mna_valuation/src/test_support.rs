//! Shared fixtures for unit tests.

use mna_core::types::{Classification, GrowthStage, Industry};
use mna_model::assumptions::AssumptionSet;
use mna_model::historical::{normalize, RawFinancials};
use mna_model::projection::{ProjectionConfig, Projector};
use mna_model::FinancialModel;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub(crate) fn mature_other() -> Classification {
    Classification::new(GrowthStage::Mature, Industry::Other)
}

fn acme_lines() -> [(&'static str, Decimal); 20] {
    [
        ("revenue", dec!(1000)),
        ("operating_income", dec!(150)),
        ("net_income", dec!(100)),
        ("cash", dec!(120)),
        ("receivables", dec!(90)),
        ("inventory", dec!(60)),
        ("other_current_assets", dec!(10)),
        ("net_ppe", dec!(400)),
        ("goodwill", dec!(50)),
        ("payables", dec!(70)),
        ("other_current_liabilities", dec!(30)),
        ("short_term_debt", dec!(20)),
        ("long_term_debt", dec!(180)),
        ("other_non_current_liabilities", dec!(30)),
        ("retained_earnings", dec!(250)),
        ("total_equity", dec!(400)),
        ("shares_outstanding", dec!(100)),
        ("market_price", dec!(15)),
        ("market_cap", dec!(1500)),
        ("tax_expense", dec!(33)),
    ]
}

fn assumptions(horizon: usize) -> AssumptionSet {
    AssumptionSet {
        revenue_growth: vec![dec!(0.08); horizon],
        gross_margin: vec![dec!(0.40); horizon],
        operating_margin: vec![dec!(0.15); horizon],
        capex_to_revenue: dec!(0.05),
        working_capital_to_revenue: dec!(0.06),
        tax_rate: dec!(0.25),
        depreciation_rate: dec!(0.10),
        target_debt_to_equity: dec!(0.50),
        payout_ratio: dec!(0.30),
        share_change: None,
    }
}

/// Every line of the Acme snapshot multiplied by `scale`, price unchanged.
pub(crate) fn scaled_model(name: &str, scale: Decimal, horizon: usize) -> FinancialModel {
    let raw = acme_lines()
        .into_iter()
        .fold(RawFinancials::new(name), |raw, (field, value)| {
            let value = if field == "market_price" {
                value
            } else {
                value * scale
            };
            raw.with(field, value)
        });
    let historical = normalize(&raw).unwrap();
    Projector::new(ProjectionConfig::default().with_horizon(horizon))
        .project(&historical, &assumptions(horizon))
        .unwrap()
}

/// Balanced mid-size company: revenue 1000, debt 200, 100 shares at 15.
pub(crate) fn acme_model(horizon: usize) -> FinancialModel {
    scaled_model("Acme", Decimal::ONE, horizon)
}

/// Debt-free company projected at a zero operating margin.
pub(crate) fn zero_earnings_model() -> FinancialModel {
    let raw = RawFinancials::new("Breakeven")
        .with("revenue", dec!(1000))
        .with("cash", dec!(500))
        .with("net_ppe", dec!(500))
        .with("retained_earnings", dec!(1000))
        .with("total_equity", dec!(1000))
        .with("shares_outstanding", dec!(100))
        .with("market_price", dec!(10))
        .with("market_cap", dec!(1000));
    let historical = normalize(&raw).unwrap();
    let mut assumptions = assumptions(3);
    assumptions.operating_margin = vec![Decimal::ZERO; 3];
    assumptions.target_debt_to_equity = Decimal::ZERO;
    Projector::new(ProjectionConfig::default().with_horizon(3))
        .project(&historical, &assumptions)
        .unwrap()
}
