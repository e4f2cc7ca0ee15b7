//! Projected income statement.

use mna_core::types::Money;
use rust_decimal::Decimal;
use serde::Serialize;

/// Income statement for one projected year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeStatement {
    /// Revenue
    pub revenue: Money,
    /// Cost of revenue
    pub cost_of_revenue: Money,
    /// Revenue less cost of revenue
    pub gross_profit: Money,
    /// Operating expenses including depreciation
    pub operating_expenses: Money,
    /// Operating income
    pub operating_income: Money,
    /// Depreciation on opening net PP&E
    pub depreciation: Money,
    /// Operating income plus depreciation
    pub ebitda: Money,
    /// Interest on opening debt
    pub interest_expense: Money,
    /// Operating income less interest
    pub pre_tax_income: Money,
    /// Tax on positive pre-tax income only
    pub tax_expense: Money,
    /// Net income
    pub net_income: Money,
    /// Weighted shares outstanding
    pub shares_outstanding: Decimal,
    /// Net income per share
    pub eps: Decimal,
    /// Dividends declared
    pub dividends: Money,
}

impl IncomeStatement {
    /// Gross profit over revenue.
    pub fn gross_margin(&self) -> Option<Decimal> {
        mna_core::types::checked_ratio(self.gross_profit, self.revenue)
    }

    /// Operating income over revenue.
    pub fn operating_margin(&self) -> Option<Decimal> {
        mna_core::types::checked_ratio(self.operating_income, self.revenue)
    }

    /// Tax expense over pre-tax income.
    pub fn effective_tax_rate(&self) -> Option<Decimal> {
        mna_core::types::checked_ratio(self.tax_expense, self.pre_tax_income)
    }
}
