//! Financial ratios per period.
//!
//! A ratio whose denominator is zero is `None`. It is never reported as
//! zero, so downstream consumers can tell "no data" from "nothing".

use crate::historical::{Field, HistoricalPeriod};
use crate::model::{FinancialModel, ProjectedPeriod};
use crate::statements::BalanceSheet;
use mna_core::types::{checked_ratio, Money};
use rust_decimal::Decimal;
use serde::Serialize;

/// Profitability ratios.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[allow(missing_docs)]
pub struct Profitability {
    pub gross_margin: Option<Decimal>,
    pub operating_margin: Option<Decimal>,
    pub ebitda_margin: Option<Decimal>,
    pub net_margin: Option<Decimal>,
    pub fcf_margin: Option<Decimal>,
    pub return_on_equity: Option<Decimal>,
    pub return_on_assets: Option<Decimal>,
}

/// Liquidity ratios.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[allow(missing_docs)]
pub struct Liquidity {
    pub current_ratio: Option<Decimal>,
    pub quick_ratio: Option<Decimal>,
    pub cash_ratio: Option<Decimal>,
}

/// Leverage ratios.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[allow(missing_docs)]
pub struct Leverage {
    pub debt_to_equity: Option<Decimal>,
    pub debt_to_assets: Option<Decimal>,
    pub net_debt_to_ebitda: Option<Decimal>,
    /// Operating income over interest expense
    pub interest_coverage: Option<Decimal>,
}

/// Cash-flow ratios.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[allow(missing_docs)]
pub struct CashFlowRatios {
    /// Operating cash flow over net income
    pub cash_conversion: Option<Decimal>,
    /// Free cash flow over net income
    pub fcf_conversion: Option<Decimal>,
    pub capex_to_revenue: Option<Decimal>,
    pub revenue_growth: Option<Decimal>,
}

/// All ratios for one year; year 0 is the historical period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialRatios {
    /// 0 for the historical year, otherwise the projection year
    pub year: u32,
    /// Profitability ratios
    pub profitability: Profitability,
    /// Liquidity ratios
    pub liquidity: Liquidity,
    /// Leverage ratios
    pub leverage: Leverage,
    /// Cash-flow ratios
    pub cash_flow: CashFlowRatios,
}

/// Flow figures shared by historical and projected years.
struct Flows {
    revenue: Money,
    gross_profit: Option<Money>,
    operating_income: Money,
    ebitda: Money,
    net_income: Money,
    interest_expense: Money,
    operating_cash_flow: Money,
    capex: Money,
}

fn compute(year: u32, flows: Flows, bs: &BalanceSheet, prior_revenue: Option<Money>) -> FinancialRatios {
    let fcf = flows.operating_cash_flow - flows.capex;
    let current_liabilities = bs.total_current_liabilities();
    FinancialRatios {
        year,
        profitability: Profitability {
            gross_margin: flows.gross_profit.and_then(|gp| checked_ratio(gp, flows.revenue)),
            operating_margin: checked_ratio(flows.operating_income, flows.revenue),
            ebitda_margin: checked_ratio(flows.ebitda, flows.revenue),
            net_margin: checked_ratio(flows.net_income, flows.revenue),
            fcf_margin: checked_ratio(fcf, flows.revenue),
            return_on_equity: checked_ratio(flows.net_income, bs.total_equity()),
            return_on_assets: checked_ratio(flows.net_income, bs.total_assets()),
        },
        liquidity: Liquidity {
            current_ratio: checked_ratio(bs.total_current_assets(), current_liabilities),
            quick_ratio: checked_ratio(bs.total_current_assets() - bs.inventory, current_liabilities),
            cash_ratio: checked_ratio(bs.cash, current_liabilities),
        },
        leverage: Leverage {
            debt_to_equity: checked_ratio(bs.total_debt(), bs.total_equity()),
            debt_to_assets: checked_ratio(bs.total_debt(), bs.total_assets()),
            net_debt_to_ebitda: checked_ratio(bs.net_debt(), flows.ebitda),
            interest_coverage: checked_ratio(flows.operating_income, flows.interest_expense),
        },
        cash_flow: CashFlowRatios {
            cash_conversion: checked_ratio(flows.operating_cash_flow, flows.net_income),
            fcf_conversion: checked_ratio(fcf, flows.net_income),
            capex_to_revenue: checked_ratio(flows.capex, flows.revenue),
            revenue_growth: prior_revenue
                .and_then(|prior| checked_ratio(flows.revenue - prior, prior)),
        },
    }
}

/// Ratios for a projected year; `prior_revenue` drives revenue growth.
pub fn period_ratios(period: &ProjectedPeriod, prior_revenue: Option<Money>) -> FinancialRatios {
    let is = &period.income;
    let cf = &period.cash_flow;
    compute(
        period.year,
        Flows {
            revenue: is.revenue,
            gross_profit: Some(is.gross_profit),
            operating_income: is.operating_income,
            ebitda: is.ebitda,
            net_income: is.net_income,
            interest_expense: is.interest_expense,
            operating_cash_flow: cf.operating_cash_flow,
            capex: cf.capex,
        },
        &period.balance,
        prior_revenue,
    )
}

/// Ratios for the historical year against its opening balance sheet.
///
/// Gross margin is absent when the provider did not report cost of revenue.
pub fn historical_ratios(historical: &HistoricalPeriod, balance: &BalanceSheet) -> FinancialRatios {
    let h = historical;
    let gross_profit = h
        .report
        .was_supplied(Field::CostOfRevenue)
        .then(|| h.revenue - h.cost_of_revenue);
    compute(
        0,
        Flows {
            revenue: h.revenue,
            gross_profit,
            operating_income: h.operating_income,
            ebitda: h.ebitda,
            net_income: h.net_income,
            interest_expense: h.interest_expense,
            operating_cash_flow: h.operating_cash_flow,
            capex: h.capex,
        },
        balance,
        None,
    )
}

/// Historical year followed by every projected year.
pub fn ratios_for_model(model: &FinancialModel) -> Vec<FinancialRatios> {
    let mut out = Vec::with_capacity(model.horizon() + 1);
    out.push(historical_ratios(model.historical(), model.opening_balance()));
    let mut prior_revenue = model.historical().revenue;
    for period in model.periods() {
        out.push(period_ratios(period, Some(prior_revenue)));
        prior_revenue = period.income.revenue;
    }
    out
}
