//! Year-by-year three-statement projection.

use super::plug;
use super::ProjectionConfig;
use crate::assumptions::AssumptionSet;
use crate::historical::HistoricalPeriod;
use crate::model::{EquityRestatement, FinancialModel, ProjectedPeriod};
use crate::statements::{BalanceSheet, CashFlowStatement, IncomeStatement};
use chrono::Months;
use mna_core::types::{divide, EngineError, EngineResult, Money, MAX_AMOUNT};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Gross margin ceiling applied to every projected year.
pub const MAX_GROSS_MARGIN: Decimal = dec!(0.95);
/// Operating margin ceiling applied to every projected year.
pub const MAX_OPERATING_MARGIN: Decimal = dec!(0.50);

/// Three-statement projector.
///
/// Stateless apart from its configuration; one value can project any number
/// of companies, from any number of threads.
///
/// # Example
///
/// ```
/// use mna_core::types::GrowthStage;
/// use mna_model::assumptions::defaults::for_stage;
/// use mna_model::historical::{normalize, RawFinancials};
/// use mna_model::projection::{ProjectionConfig, Projector};
/// use rust_decimal_macros::dec;
///
/// let raw = RawFinancials::new("Acme")
///     .with("revenue", dec!(1000))
///     .with("operating_income", dec!(150))
///     .with("cash", dec!(100))
///     .with("net_ppe", dec!(300))
///     .with("total_equity", dec!(400))
///     .with("shares_outstanding", dec!(100))
///     .with("market_price", dec!(20))
///     .with("market_cap", dec!(2000));
/// let historical = normalize(&raw).unwrap();
/// let assumptions = for_stage(GrowthStage::Mature, 5).unwrap();
///
/// let model = Projector::new(ProjectionConfig::default())
///     .project(&historical, &assumptions)
///     .unwrap();
/// assert_eq!(model.horizon(), 5);
/// assert!(model.final_period().balance.is_balanced(dec!(0.01)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Projector {
    config: ProjectionConfig,
}

/// Checked arithmetic that names the projected year on overflow.
#[derive(Clone, Copy)]
struct YearMath(usize);

impl YearMath {
    fn add(self, a: Decimal, b: Decimal, line: &str) -> EngineResult<Decimal> {
        a.checked_add(b).ok_or_else(|| self.overflow(line))
    }

    fn sub(self, a: Decimal, b: Decimal, line: &str) -> EngineResult<Decimal> {
        a.checked_sub(b).ok_or_else(|| self.overflow(line))
    }

    fn mul(self, a: Decimal, b: Decimal, line: &str) -> EngineResult<Decimal> {
        a.checked_mul(b).ok_or_else(|| self.overflow(line))
    }

    fn overflow(self, line: &str) -> EngineError {
        EngineError::configuration(format!(
            "year {}: {line} overflowed the decimal range",
            self.0
        ))
    }
}

/// Carried from one projected year to the next.
struct YearState {
    balance: BalanceSheet,
    revenue: Money,
    shares: Decimal,
}

impl Projector {
    /// Create a projector.
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Projector with default configuration.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Configuration in use.
    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project `historical` forward under `assumptions`.
    ///
    /// # Errors
    ///
    /// - `Configuration`: invalid configuration, zero shares outstanding, or a
    ///   projected year whose revenue passes [`MAX_AMOUNT`] or whose arithmetic
    ///   leaves the decimal range
    /// - `InvalidAssumption`: assumption out of range or too short
    /// - `BalanceIntegrity`: the plug could not close the imbalance
    /// - `CashFlowTie`: cash-flow statement disagrees with the cash delta
    pub fn project(
        &self,
        historical: &HistoricalPeriod,
        assumptions: &AssumptionSet,
    ) -> EngineResult<FinancialModel> {
        self.config.validate()?;
        assumptions.validate(self.config.horizon)?;
        if historical.shares_outstanding <= Decimal::ZERO {
            return Err(EngineError::configuration(
                "shares outstanding must be positive",
            ));
        }

        let (opening, restatement) = opening_balance_sheet(historical);
        if let Some(r) = &restatement {
            if r.amount.abs() > self.config.balance_tolerance {
                tracing::warn!(
                    company = %historical.company,
                    amount = %r.amount,
                    "reported opening balance sheet does not balance; other equity restated"
                );
            }
        }

        let mut state = YearState {
            balance: opening.clone(),
            revenue: historical.revenue,
            shares: historical.shares_outstanding,
        };
        let mut periods = Vec::with_capacity(self.config.horizon);
        for year in 1..=self.config.horizon {
            let period = self.project_year(year, historical, assumptions, &state)?;
            state = YearState {
                balance: period.balance.clone(),
                revenue: period.income.revenue,
                shares: period.income.shares_outstanding,
            };
            periods.push(period);
        }

        tracing::info!(
            company = %historical.company,
            horizon = self.config.horizon,
            policy = %self.config.plug_policy,
            "projection complete"
        );

        FinancialModel::new(
            historical.clone(),
            assumptions.clone(),
            self.config.clone(),
            opening,
            restatement,
            periods,
        )
    }

    fn project_year(
        &self,
        year: usize,
        historical: &HistoricalPeriod,
        assumptions: &AssumptionSet,
        prior: &YearState,
    ) -> EngineResult<ProjectedPeriod> {
        let m = YearMath(year);
        let opening = &prior.balance;
        let income = self.income_statement(year, assumptions, prior)?;
        let capex = m.mul(assumptions.capex_to_revenue, income.revenue, "capex")?;

        let mut balance = self.provisional_balance(year, assumptions, prior, &income, capex)?;

        let ceiling = match self.config.debt_capacity {
            Some(multiple) => Some(m.mul(
                multiple,
                income.ebitda.max(Decimal::ZERO),
                "debt capacity",
            )?),
            None => None,
        };
        let adjustment = plug::apply(self.config.plug_policy, &mut balance, ceiling);
        if adjustment.capacity_limited {
            tracing::warn!(year, residual = %adjustment.residual, "plug debt limited by capacity");
        } else if !adjustment.is_empty() {
            tracing::debug!(
                year,
                imbalance = %adjustment.imbalance,
                cash = %adjustment.cash,
                debt = %adjustment.debt,
                equity = %adjustment.equity,
                "balance sheet plugged"
            );
        }

        let tolerance = self.config.balance_tolerance;
        if !balance.is_balanced(tolerance) {
            return Err(EngineError::balance_integrity(
                year as u32,
                balance.total_assets(),
                balance.total_liabilities_and_equity(),
            ));
        }

        let cash_flow = CashFlowStatement::derive(&income, opening, &balance, capex);
        let cash_delta = balance.cash - opening.cash;
        if (cash_flow.net_change_in_cash - cash_delta).abs() > tolerance {
            return Err(EngineError::cash_flow_tie(
                year as u32,
                cash_flow.net_change_in_cash,
                cash_delta,
            ));
        }

        Ok(ProjectedPeriod {
            year: year as u32,
            period_end: historical
                .fiscal_year_end
                .and_then(|d| d.checked_add_months(Months::new(12 * year as u32))),
            income,
            balance,
            cash_flow,
            plug: adjustment,
        })
    }

    fn income_statement(
        &self,
        year: usize,
        assumptions: &AssumptionSet,
        prior: &YearState,
    ) -> EngineResult<IncomeStatement> {
        let m = YearMath(year);
        let growth = m.add(Decimal::ONE, assumptions.growth(year), "growth factor")?;
        let revenue = m.mul(prior.revenue, growth, "revenue")?;
        if revenue.abs() > MAX_AMOUNT {
            return Err(EngineError::configuration(format!(
                "year {year}: projected revenue {revenue} exceeds the supported magnitude {MAX_AMOUNT}"
            )));
        }
        let gross_margin = assumptions.gross_margin[year - 1].min(MAX_GROSS_MARGIN);
        let operating_margin = assumptions.operating_margin[year - 1].min(MAX_OPERATING_MARGIN);

        let gross_profit = m.mul(revenue, gross_margin, "gross profit")?;
        let operating_income = m.mul(revenue, operating_margin, "operating income")?;
        let depreciation = m.mul(
            assumptions.depreciation_rate,
            prior.balance.net_ppe,
            "depreciation",
        )?;
        let interest_expense = m.mul(
            self.config.interest_rate,
            prior.balance.total_debt(),
            "interest expense",
        )?;

        let pre_tax_income = m.sub(operating_income, interest_expense, "pre-tax income")?;
        let tax_expense = m.mul(
            pre_tax_income.max(Decimal::ZERO),
            assumptions.tax_rate,
            "tax expense",
        )?;
        let net_income = m.sub(pre_tax_income, tax_expense, "net income")?;

        let share_factor = m.add(Decimal::ONE, assumptions.share_change(year), "share change")?;
        let shares_outstanding = m.mul(prior.shares, share_factor, "shares outstanding")?;
        let eps = divide(net_income, shares_outstanding, "shares outstanding")?;

        Ok(IncomeStatement {
            revenue,
            cost_of_revenue: m.sub(revenue, gross_profit, "cost of revenue")?,
            gross_profit,
            operating_expenses: m.sub(gross_profit, operating_income, "operating expenses")?,
            operating_income,
            depreciation,
            ebitda: m.add(operating_income, depreciation, "EBITDA")?,
            interest_expense,
            pre_tax_income,
            tax_expense,
            net_income,
            shares_outstanding,
            eps,
            dividends: m.mul(
                assumptions.payout_ratio,
                net_income.max(Decimal::ZERO),
                "dividends",
            )?,
        })
    }

    /// Every line projected independently; cash carried forward unchanged.
    fn provisional_balance(
        &self,
        year: usize,
        assumptions: &AssumptionSet,
        prior: &YearState,
        income: &IncomeStatement,
        capex: Money,
    ) -> EngineResult<BalanceSheet> {
        let m = YearMath(year);
        let opening = &prior.balance;
        let scale = divide(income.revenue, prior.revenue, "prior-year revenue")?;

        let payables = m.mul(opening.payables, scale, "payables")?;
        let other_current_liabilities = m.mul(
            opening.other_current_liabilities,
            scale,
            "other current liabilities",
        )?;

        let nwc = opening.net_working_capital();
        let target_nwc = m.mul(
            assumptions.working_capital_to_revenue,
            income.revenue,
            "working capital target",
        )?;
        let gap = m.sub(target_nwc, nwc, "working capital gap")?;
        let step = m.mul(self.config.working_capital_speed, gap, "working capital step")?;
        let nwc = m.add(nwc, step, "net working capital")?;
        let current_assets = m.add(
            m.add(nwc, payables, "current assets")?,
            other_current_liabilities,
            "current assets",
        )?;
        let [receivables, inventory, other_current_assets] = allocate(
            current_assets,
            [
                opening.receivables,
                opening.inventory,
                opening.other_current_assets,
            ],
            0,
        );

        let retained_earnings = m.sub(
            m.add(opening.retained_earnings, income.net_income, "retained earnings")?,
            income.dividends,
            "retained earnings",
        )?;
        let closing_equity = m.add(retained_earnings, opening.other_equity, "closing equity")?;

        let debt = opening.total_debt();
        let target_debt = m.mul(
            assumptions.target_debt_to_equity,
            closing_equity.max(Decimal::ZERO),
            "target debt",
        )?;
        let gap = m.sub(target_debt, debt, "leverage gap")?;
        let debt = m.add(
            debt,
            m.mul(self.config.leverage_speed, gap, "leverage step")?,
            "debt",
        )?;
        let [short_term_debt, long_term_debt] =
            allocate(debt, [opening.short_term_debt, opening.long_term_debt], 1);
        let net_ppe = m.sub(
            m.add(opening.net_ppe, capex, "net PP&E")?,
            income.depreciation,
            "net PP&E",
        )?;

        Ok(BalanceSheet {
            cash: opening.cash,
            receivables,
            inventory,
            other_current_assets,
            net_ppe,
            goodwill: opening.goodwill,
            intangibles: opening.intangibles,
            other_non_current_assets: opening.other_non_current_assets,
            payables,
            other_current_liabilities,
            short_term_debt,
            long_term_debt,
            other_non_current_liabilities: opening.other_non_current_liabilities,
            retained_earnings,
            other_equity: opening.other_equity,
        })
    }
}

/// Opening balance sheet from the historical snapshot.
///
/// Other equity is total equity less retained earnings. When the reported
/// lines do not balance, other equity absorbs the difference and the
/// restatement is returned alongside.
pub fn opening_balance_sheet(
    historical: &HistoricalPeriod,
) -> (BalanceSheet, Option<EquityRestatement>) {
    let h = historical;
    let mut sheet = BalanceSheet {
        cash: h.cash,
        receivables: h.receivables,
        inventory: h.inventory,
        other_current_assets: h.other_current_assets,
        net_ppe: h.net_ppe,
        goodwill: h.goodwill,
        intangibles: h.intangibles,
        other_non_current_assets: h.other_non_current_assets,
        payables: h.payables,
        other_current_liabilities: h.other_current_liabilities,
        short_term_debt: h.short_term_debt,
        long_term_debt: h.long_term_debt,
        other_non_current_liabilities: h.other_non_current_liabilities,
        retained_earnings: h.retained_earnings,
        other_equity: h.total_equity - h.retained_earnings,
    };

    let imbalance = sheet.imbalance();
    if imbalance.is_zero() {
        return (sheet, None);
    }
    let restatement = EquityRestatement {
        reported_assets: sheet.total_assets(),
        reported_liabilities_and_equity: sheet.total_liabilities_and_equity(),
        amount: imbalance,
    };
    sheet.other_equity += imbalance;
    (sheet, Some(restatement))
}

/// Split `total` in proportion to `weights`; the last line takes the rounding
/// remainder. All of it goes to `fallback` when the weights sum to zero.
fn allocate<const N: usize>(total: Money, weights: [Money; N], fallback: usize) -> [Money; N] {
    let mut out = [Decimal::ZERO; N];
    let sum: Decimal = weights.iter().sum();
    if sum.is_zero() {
        out[fallback] = total;
        return out;
    }
    let mut assigned = Decimal::ZERO;
    for i in 0..N - 1 {
        out[i] = total * weights[i] / sum;
        assigned += out[i];
    }
    out[N - 1] = total - assigned;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::historical::{normalize, RawFinancials};
    use crate::projection::PlugPolicy;
    use chrono::NaiveDate;

    fn acme() -> HistoricalPeriod {
        let raw = RawFinancials::new("Acme")
            .with_fiscal_year_end(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap())
            .with("revenue", dec!(1000))
            .with("operating_income", dec!(150))
            .with("net_income", dec!(100))
            .with("cash", dec!(120))
            .with("receivables", dec!(90))
            .with("inventory", dec!(60))
            .with("other_current_assets", dec!(10))
            .with("net_ppe", dec!(400))
            .with("goodwill", dec!(50))
            .with("payables", dec!(70))
            .with("other_current_liabilities", dec!(30))
            .with("short_term_debt", dec!(20))
            .with("long_term_debt", dec!(180))
            .with("other_non_current_liabilities", dec!(30))
            .with("retained_earnings", dec!(250))
            .with("total_equity", dec!(400))
            .with("shares_outstanding", dec!(100))
            .with("market_price", dec!(15))
            .with("market_cap", dec!(1500));
        normalize(&raw).unwrap()
    }

    /// `acme` scaled so that revenue is `revenue`; the opening sheet still balances.
    fn acme_with_revenue(revenue: Decimal) -> HistoricalPeriod {
        let mut h = acme();
        let k = revenue / h.revenue;
        for line in [
            &mut h.revenue,
            &mut h.operating_income,
            &mut h.net_income,
            &mut h.cash,
            &mut h.receivables,
            &mut h.inventory,
            &mut h.other_current_assets,
            &mut h.net_ppe,
            &mut h.goodwill,
            &mut h.payables,
            &mut h.other_current_liabilities,
            &mut h.short_term_debt,
            &mut h.long_term_debt,
            &mut h.other_non_current_liabilities,
            &mut h.retained_earnings,
            &mut h.total_equity,
        ] {
            *line *= k;
        }
        h
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

    // ========================================
    // Opening Balance Tests
    // ========================================

    #[test]
    fn test_opening_balance_from_reported_lines() {
        let (bs, restatement) = opening_balance_sheet(&acme());
        assert!(restatement.is_none());
        assert_eq!(bs.total_assets(), dec!(730));
        assert_eq!(bs.other_equity, dec!(150));
        assert_eq!(bs.net_working_capital(), dec!(60));
    }

    #[test]
    fn test_unbalanced_opening_is_restated() {
        let mut h = acme();
        h.total_equity = dec!(390);
        let (bs, restatement) = opening_balance_sheet(&h);
        let r = restatement.unwrap();
        assert_eq!(r.amount, dec!(10));
        assert_eq!(bs.other_equity, dec!(150));
        assert!(bs.is_balanced(Decimal::ZERO));
    }

    // ========================================
    // Income Statement Tests
    // ========================================

    #[test]
    fn test_first_year_income_statement() {
        let model = Projector::with_defaults()
            .project(&acme(), &assumptions(5))
            .unwrap();
        let is = &model.periods()[0].income;

        assert_eq!(is.revenue, dec!(1080));
        assert_eq!(is.gross_profit, dec!(432));
        assert_eq!(is.operating_income, dec!(162));
        assert_eq!(is.depreciation, dec!(40));
        assert_eq!(is.ebitda, dec!(202));
        // 5% on opening debt of 200
        assert_eq!(is.interest_expense, dec!(10));
        assert_eq!(is.tax_expense, dec!(38));
        assert_eq!(is.net_income, dec!(114));
        assert_eq!(is.eps, dec!(1.14));
        assert_eq!(is.dividends, dec!(34.2));
    }

    #[test]
    fn test_margins_are_clamped() {
        let mut set = assumptions(3);
        set.gross_margin = vec![dec!(0.99); 3];
        set.operating_margin = vec![dec!(0.80); 3];
        let model = Projector::new(ProjectionConfig::default().with_horizon(3))
            .project(&acme(), &set)
            .unwrap();
        let is = &model.periods()[0].income;
        assert_eq!(is.gross_margin(), Some(dec!(0.95)));
        assert_eq!(is.operating_margin(), Some(dec!(0.50)));
    }

    #[test]
    fn test_negative_pre_tax_income_pays_no_tax() {
        let mut h = acme();
        h.long_term_debt = dec!(5000);
        h.cash += dec!(4820);
        let mut set = assumptions(2);
        set.operating_margin = vec![dec!(0.05); 2];
        let model = Projector::new(ProjectionConfig::default().with_horizon(2))
            .project(&h, &set)
            .unwrap();
        let is = &model.periods()[0].income;
        assert!(is.pre_tax_income < Decimal::ZERO);
        assert_eq!(is.tax_expense, Decimal::ZERO);
        assert_eq!(is.dividends, Decimal::ZERO);
    }

    #[test]
    fn test_share_change_applies_to_eps() {
        let mut set = assumptions(2);
        set.share_change = Some(vec![dec!(-0.10), dec!(0)]);
        let model = Projector::new(ProjectionConfig::default().with_horizon(2))
            .project(&acme(), &set)
            .unwrap();
        assert_eq!(model.periods()[0].income.shares_outstanding, dec!(90));
        assert_eq!(model.periods()[1].income.shares_outstanding, dec!(90));
    }

    // ========================================
    // Balance Sheet and Cash Flow Tests
    // ========================================

    #[test]
    fn test_every_year_balances_and_ties() {
        let model = Projector::with_defaults()
            .project(&acme(), &assumptions(5))
            .unwrap();
        let mut prior_cash = model.opening_balance().cash;
        for p in model.periods() {
            assert!(p.balance.is_balanced(dec!(0.01)), "year {}", p.year);
            assert!(
                (p.cash_flow.net_change_in_cash - (p.balance.cash - prior_cash)).abs()
                    <= dec!(0.01)
            );
            assert_eq!(
                p.cash_flow.free_cash_flow,
                p.cash_flow.operating_cash_flow - p.cash_flow.capex
            );
            prior_cash = p.balance.cash;
        }
    }

    #[test]
    fn test_working_capital_converges_gradually() {
        let model = Projector::with_defaults()
            .project(&acme(), &assumptions(5))
            .unwrap();
        // Opening NWC 60; year-one target 6% of 1080 = 64.8; half the gap closes
        assert_eq!(model.periods()[0].balance.net_working_capital(), dec!(62.4));
    }

    #[test]
    fn test_ppe_rolls_forward() {
        let model = Projector::with_defaults()
            .project(&acme(), &assumptions(5))
            .unwrap();
        let p1 = &model.periods()[0];
        assert_eq!(p1.balance.net_ppe, dec!(400) + dec!(54) - dec!(40));
        assert_eq!(p1.balance.goodwill, dec!(50));
    }

    #[test]
    fn test_period_end_dates() {
        let model = Projector::with_defaults()
            .project(&acme(), &assumptions(5))
            .unwrap();
        assert_eq!(
            model.period(3).unwrap().period_end,
            NaiveDate::from_ymd_opt(2027, 12, 31)
        );
    }

    #[test]
    fn test_equity_policy_keeps_cash_flat() {
        let config = ProjectionConfig::default().with_plug_policy(PlugPolicy::Equity);
        let model = Projector::new(config)
            .project(&acme(), &assumptions(5))
            .unwrap();
        for p in model.periods() {
            assert_eq!(p.balance.cash, dec!(120));
            assert!(p.plug.cash.is_zero());
        }
    }

    #[test]
    fn test_no_debt_capacity_fails_integrity() {
        // Heavy capex with no cash and no room to borrow
        let mut h = acme();
        h.cash = Decimal::ZERO;
        h.total_equity -= dec!(120);
        let mut set = assumptions(3);
        set.capex_to_revenue = dec!(0.60);
        set.target_debt_to_equity = Decimal::ZERO;
        let config = ProjectionConfig::default()
            .with_horizon(3)
            .with_debt_capacity(Decimal::ZERO);

        let err = Projector::new(config).project(&h, &set).unwrap_err();
        assert!(err.is_balance_integrity(), "got {:?}", err);
    }

    // ========================================
    // Validation Tests
    // ========================================

    #[test]
    fn test_short_assumptions_rejected() {
        let err = Projector::with_defaults()
            .project(&acme(), &assumptions(3))
            .unwrap_err();
        assert!(err.is_invalid_assumption());
    }

    #[test]
    fn test_runaway_growth_fails_with_typed_error() {
        let h = acme_with_revenue(dec!(10000000000));
        let mut set = assumptions(30);
        set.revenue_growth = vec![dec!(5.0); 30];
        let config = ProjectionConfig::default().with_horizon(30);

        let err = Projector::new(config).project(&h, &set).unwrap_err();
        assert!(err.is_configuration(), "got {:?}", err);
        assert!(format!("{}", err).contains("year "));
    }

    #[test]
    fn test_collapsing_revenue_never_panics() {
        let h = acme_with_revenue(dec!(10000000000));
        let mut set = assumptions(30);
        set.revenue_growth = vec![dec!(-0.95); 30];
        let config = ProjectionConfig::default().with_horizon(30);

        match Projector::new(config).project(&h, &set) {
            Ok(model) => {
                for p in model.periods() {
                    assert!(p.balance.is_balanced(dec!(0.01)), "year {}", p.year);
                }
            }
            Err(err) => assert!(
                err.is_configuration() || err.is_balance_integrity() || err.is_cash_flow_tie(),
                "got {:?}",
                err
            ),
        }
    }

    #[test]
    fn test_allocate_preserves_total() {
        let parts = allocate(dec!(100), [dec!(1), dec!(1), dec!(1)], 0);
        assert_eq!(parts.iter().sum::<Decimal>(), dec!(100));
        assert_eq!(allocate(dec!(50), [Decimal::ZERO; 2], 1), [dec!(0), dec!(50)]);
    }
}
