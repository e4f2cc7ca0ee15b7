//! Accounting identities over generated assumption sets.

use mna_core::types::EngineResult;
use mna_model::assumptions::AssumptionSet;
use mna_model::historical::{normalize, HistoricalPeriod, RawFinancials};
use mna_model::projection::{PlugPolicy, ProjectionConfig, Projector, MAX_HORIZON};
use mna_model::FinancialModel;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn sample_company(revenue: Decimal, debt: Decimal) -> HistoricalPeriod {
    // Balanced: assets 0.8R + debt, liabilities 0.1R + debt, equity 0.7R
    let raw = RawFinancials::new("Generated")
        .with("revenue", revenue)
        .with("cost_of_revenue", revenue * dec!(0.6))
        .with("operating_income", revenue * dec!(0.15))
        .with("cash", revenue * dec!(0.2) + debt)
        .with("receivables", revenue * dec!(0.1))
        .with("net_ppe", revenue * dec!(0.4))
        .with("goodwill", revenue * dec!(0.1))
        .with("payables", revenue * dec!(0.1))
        .with("long_term_debt", debt)
        .with("retained_earnings", revenue * dec!(0.4))
        .with("total_equity", revenue * dec!(0.7))
        .with("shares_outstanding", dec!(1000))
        .with("market_price", dec!(50))
        .with("market_cap", dec!(50000));
    normalize(&raw).unwrap()
}

fn flat_assumptions(horizon: usize, growth: Decimal, gm: Decimal, om: Decimal) -> AssumptionSet {
    AssumptionSet {
        revenue_growth: vec![growth; horizon],
        gross_margin: vec![gm; horizon],
        operating_margin: vec![om; horizon],
        capex_to_revenue: dec!(0.05),
        working_capital_to_revenue: dec!(0.10),
        tax_rate: dec!(0.25),
        depreciation_rate: dec!(0.10),
        target_debt_to_equity: Decimal::ZERO,
        payout_ratio: Decimal::ZERO,
        share_change: None,
    }
}

// ========================================
// End-to-End Scenario
// ========================================

#[test]
fn test_ten_billion_company_five_years() {
    let historical = sample_company(dec!(10000000000.00), Decimal::ZERO);
    let assumptions = flat_assumptions(5, dec!(0.10), dec!(0.40), dec!(0.15));

    let model = Projector::with_defaults()
        .project(&historical, &assumptions)
        .unwrap();

    assert_eq!(model.horizon(), 5);
    assert_eq!(
        model.final_period().income.revenue,
        dec!(16105100000)
    );
    for period in model.periods() {
        assert!(period.balance.is_balanced(dec!(0.01)), "year {}", period.year);
    }
}

#[test]
fn test_model_reference() {
    let historical = sample_company(dec!(1000), Decimal::ZERO);
    let model = Projector::with_defaults()
        .project(&historical, &flat_assumptions(5, dec!(0.05), dec!(0.4), dec!(0.1)))
        .unwrap();
    let reference = model.reference();
    assert_eq!(reference.company, "Generated");
    assert_eq!(reference.horizon, 5);
    assert_eq!(model.free_cash_flows().len(), 5);
    assert_eq!(model.opening_balance_for(1), Some(model.opening_balance()));
    assert_eq!(
        model.opening_balance_for(3),
        Some(&model.periods()[1].balance)
    );
}

// ========================================
// Admissible Extremes
// ========================================

/// Balanced model or a typed engine error; never anything else.
fn assert_balanced_or_typed(result: EngineResult<FinancialModel>) {
    match result {
        Ok(model) => {
            for p in model.periods() {
                assert!(p.balance.imbalance().abs() <= dec!(0.01), "year {}", p.year);
            }
        }
        Err(err) => assert!(
            err.is_configuration() || err.is_balance_integrity() || err.is_cash_flow_tie(),
            "unexpected {:?}",
            err
        ),
    }
}

#[test]
fn test_growth_bounds_at_thirty_years() {
    let historical = sample_company(dec!(10000000000), dec!(5000000000));
    let config = ProjectionConfig::default().with_horizon(MAX_HORIZON);
    for growth in [dec!(-0.95), dec!(5.0)] {
        for policy in [PlugPolicy::CashThenDebt, PlugPolicy::Debt, PlugPolicy::Equity] {
            let assumptions = flat_assumptions(MAX_HORIZON, growth, dec!(0.4), dec!(0.15));
            let projector = Projector::new(config.clone().with_plug_policy(policy));
            assert_balanced_or_typed(projector.project(&historical, &assumptions));
        }
    }
}

#[test]
fn test_maximum_growth_stops_at_magnitude_ceiling() {
    let historical = sample_company(dec!(10000000000), Decimal::ZERO);
    let assumptions = flat_assumptions(MAX_HORIZON, dec!(5.0), dec!(0.4), dec!(0.15));
    let err = Projector::new(ProjectionConfig::default().with_horizon(MAX_HORIZON))
        .project(&historical, &assumptions)
        .unwrap_err();
    assert!(err.is_configuration(), "got {:?}", err);
}

// ========================================
// Properties
// ========================================

fn rate(lo: i64, hi: i64) -> impl Strategy<Value = Decimal> {
    (lo..=hi).prop_map(|bp| Decimal::new(bp, 4))
}

fn policy() -> impl Strategy<Value = PlugPolicy> {
    prop_oneof![
        Just(PlugPolicy::CashThenDebt),
        Just(PlugPolicy::Debt),
        Just(PlugPolicy::Equity),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_identities_hold_every_year(
        growth in prop::collection::vec(rate(-3000, 8000), 1..=10),
        gm in rate(1000, 9900),
        om in rate(0, 6000),
        capex in rate(0, 3000),
        wc in rate(0, 4000),
        de in rate(0, 10000),
        payout in rate(0, 10000),
        debt in (0i64..5000).prop_map(Decimal::from),
        policy in policy(),
    ) {
        let horizon = growth.len();
        let historical = sample_company(dec!(1000), debt);
        let assumptions = AssumptionSet {
            revenue_growth: growth,
            gross_margin: vec![gm; horizon],
            operating_margin: vec![om; horizon],
            capex_to_revenue: capex,
            working_capital_to_revenue: wc,
            tax_rate: dec!(0.25),
            depreciation_rate: dec!(0.10),
            target_debt_to_equity: de,
            payout_ratio: payout,
            share_change: None,
        };
        let config = ProjectionConfig::default()
            .with_horizon(horizon)
            .with_plug_policy(policy);

        let model = Projector::new(config).project(&historical, &assumptions).unwrap();

        let mut prior_cash = model.opening_balance().cash;
        for p in model.periods() {
            prop_assert!(p.balance.imbalance().abs() <= dec!(0.01));
            let delta = p.balance.cash - prior_cash;
            prop_assert!((p.cash_flow.net_change_in_cash - delta).abs() <= dec!(0.01));
            prop_assert_eq!(
                p.cash_flow.free_cash_flow,
                p.cash_flow.operating_cash_flow - p.cash_flow.capex
            );
            prop_assert!(p.income.tax_expense >= Decimal::ZERO);
            prior_cash = p.balance.cash;
        }
    }

    #[test]
    fn prop_full_range_never_panics(
        growth in prop::collection::vec(rate(-9500, 50000), 1..=MAX_HORIZON),
        revenue in (1i64..=1000).prop_map(|b| Decimal::from(b) * dec!(1000000000)),
        om in rate(0, 6000),
        de in rate(0, 10000),
        policy in policy(),
    ) {
        let horizon = growth.len();
        let historical = sample_company(revenue, revenue / dec!(2));
        let assumptions = AssumptionSet {
            revenue_growth: growth,
            target_debt_to_equity: de,
            ..flat_assumptions(horizon, Decimal::ZERO, dec!(0.4), om)
        };
        let config = ProjectionConfig::default()
            .with_horizon(horizon)
            .with_plug_policy(policy);

        assert_balanced_or_typed(Projector::new(config).project(&historical, &assumptions));
    }

    #[test]
    fn prop_revenue_compounds_exactly(
        growth in prop::collection::vec(rate(-5000, 10000), 1..=8),
    ) {
        let horizon = growth.len();
        let historical = sample_company(dec!(2500.00), Decimal::ZERO);
        let assumptions = flat_assumptions(horizon, Decimal::ZERO, dec!(0.4), dec!(0.1));
        let assumptions = AssumptionSet { revenue_growth: growth.clone(), ..assumptions };

        let model = Projector::new(ProjectionConfig::default().with_horizon(horizon))
            .project(&historical, &assumptions)
            .unwrap();

        let expected = growth
            .iter()
            .fold(dec!(2500.00), |acc, g| acc * (Decimal::ONE + g));
        prop_assert_eq!(model.final_period().income.revenue, expected);
    }
}
