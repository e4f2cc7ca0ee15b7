//! Cash-flow statement, derived from two balance sheets and an income statement.

use super::{BalanceSheet, IncomeStatement};
use mna_core::types::Money;
use serde::Serialize;

/// Cash-flow statement for one projected year.
///
/// Interest is added back in operating activities and paid in financing, so
/// free cash flow is independent of the capital structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowStatement {
    /// Net income
    pub net_income: Money,
    /// Depreciation add-back
    pub depreciation: Money,
    /// Interest expense reclassified to financing
    pub interest_addback: Money,
    /// Increase in net working capital (an outflow when positive)
    pub increase_in_working_capital: Money,
    /// Change in other non-current liabilities
    pub change_in_other_liabilities: Money,
    /// Cash from operations
    pub operating_cash_flow: Money,

    /// Capital expenditure (positive outflow)
    pub capex: Money,
    /// Increase in goodwill, intangibles and other non-current assets
    pub other_investment: Money,
    /// Cash from investing
    pub investing_cash_flow: Money,

    /// Net debt raised (repaid when negative)
    pub net_debt_issued: Money,
    /// Net equity issued (bought back when negative)
    pub net_equity_issued: Money,
    /// Dividends paid
    pub dividends_paid: Money,
    /// Interest paid
    pub interest_paid: Money,
    /// Cash from financing
    pub financing_cash_flow: Money,

    /// Operating + investing + financing
    pub net_change_in_cash: Money,
    /// Operating cash flow less capex
    pub free_cash_flow: Money,
}

impl CashFlowStatement {
    /// Derive the statement from the opening and closing balance sheets.
    ///
    /// `capex` is the year's gross capital expenditure; the closing net PP&E
    /// already reflects it.
    pub fn derive(
        income: &IncomeStatement,
        opening: &BalanceSheet,
        closing: &BalanceSheet,
        capex: Money,
    ) -> Self {
        let increase_in_working_capital =
            closing.net_working_capital() - opening.net_working_capital();
        let change_in_other_liabilities =
            closing.other_non_current_liabilities - opening.other_non_current_liabilities;
        let operating_cash_flow = income.net_income + income.depreciation + income.interest_expense
            - increase_in_working_capital
            + change_in_other_liabilities;

        let other_investment = closing.other_long_term_assets() - opening.other_long_term_assets();
        let investing_cash_flow = -capex - other_investment;

        let net_debt_issued = closing.total_debt() - opening.total_debt();
        let net_equity_issued = closing.other_equity - opening.other_equity;
        let financing_cash_flow =
            net_debt_issued + net_equity_issued - income.dividends - income.interest_expense;

        Self {
            net_income: income.net_income,
            depreciation: income.depreciation,
            interest_addback: income.interest_expense,
            increase_in_working_capital,
            change_in_other_liabilities,
            operating_cash_flow,
            capex,
            other_investment,
            investing_cash_flow,
            net_debt_issued,
            net_equity_issued,
            dividends_paid: income.dividends,
            interest_paid: income.interest_expense,
            financing_cash_flow,
            net_change_in_cash: operating_cash_flow + investing_cash_flow + financing_cash_flow,
            free_cash_flow: operating_cash_flow - capex,
        }
    }
}
