//! The linked three-statement model.

use crate::assumptions::AssumptionSet;
use crate::historical::HistoricalPeriod;
use crate::projection::{PlugAdjustment, ProjectionConfig};
use crate::statements::{BalanceSheet, CashFlowStatement, IncomeStatement};
use chrono::NaiveDate;
use mna_core::types::{EngineError, EngineResult, Money};
use serde::{Deserialize, Serialize};

/// One projected year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedPeriod {
    /// Projection year, 1-based
    pub year: u32,
    /// Period end date, when the fiscal year end is known
    pub period_end: Option<NaiveDate>,
    /// Income statement
    pub income: IncomeStatement,
    /// Closing balance sheet, after the plug
    pub balance: BalanceSheet,
    /// Cash-flow statement derived from the plugged balance sheets
    pub cash_flow: CashFlowStatement,
    /// Plug applied this year
    pub plug: PlugAdjustment,
}

/// Restatement applied when the reported opening balance sheet does not balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityRestatement {
    /// Reported total assets
    pub reported_assets: Money,
    /// Reported liabilities plus equity
    pub reported_liabilities_and_equity: Money,
    /// Amount added to other equity
    pub amount: Money,
}

/// Identifies the model a valuation was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelReference {
    /// Company name
    pub company: String,
    /// Historical fiscal year end
    pub fiscal_year_end: Option<NaiveDate>,
    /// Number of projected years
    pub horizon: usize,
}

/// A fully linked, internally consistent projection.
///
/// Only [`FinancialModel::new`] builds one, and it refuses any period set
/// that breaks the balance-sheet identity or the cash-flow tie, so every
/// value of this type satisfies both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialModel {
    historical: HistoricalPeriod,
    assumptions: AssumptionSet,
    config: ProjectionConfig,
    opening_balance: BalanceSheet,
    restatement: Option<EquityRestatement>,
    periods: Vec<ProjectedPeriod>,
}

impl FinancialModel {
    /// Assemble a model, checking both accounting identities in every period.
    ///
    /// # Errors
    ///
    /// - `Configuration` for an invalid configuration or a period count that
    ///   differs from the horizon
    /// - `BalanceIntegrity` when a closing balance sheet does not balance
    /// - `CashFlowTie` when the cash-flow statement disagrees with the cash delta
    pub fn new(
        historical: HistoricalPeriod,
        assumptions: AssumptionSet,
        config: ProjectionConfig,
        opening_balance: BalanceSheet,
        restatement: Option<EquityRestatement>,
        periods: Vec<ProjectedPeriod>,
    ) -> EngineResult<Self> {
        config.validate()?;
        if periods.len() != config.horizon {
            return Err(EngineError::configuration(format!(
                "{} periods supplied for a {}-year horizon",
                periods.len(),
                config.horizon
            )));
        }

        let tolerance = config.balance_tolerance;
        let mut prior = &opening_balance;
        for period in &periods {
            let bs = &period.balance;
            if !bs.is_balanced(tolerance) {
                return Err(EngineError::balance_integrity(
                    period.year,
                    bs.total_assets(),
                    bs.total_liabilities_and_equity(),
                ));
            }
            let cash_delta = bs.cash - prior.cash;
            if (period.cash_flow.net_change_in_cash - cash_delta).abs() > tolerance {
                return Err(EngineError::cash_flow_tie(
                    period.year,
                    period.cash_flow.net_change_in_cash,
                    cash_delta,
                ));
            }
            prior = bs;
        }

        Ok(Self {
            historical,
            assumptions,
            config,
            opening_balance,
            restatement,
            periods,
        })
    }

    /// Historical snapshot the projection starts from.
    pub fn historical(&self) -> &HistoricalPeriod {
        &self.historical
    }

    /// Assumptions used.
    pub fn assumptions(&self) -> &AssumptionSet {
        &self.assumptions
    }

    /// Projection configuration used.
    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Opening (year 0) balance sheet, after any restatement.
    pub fn opening_balance(&self) -> &BalanceSheet {
        &self.opening_balance
    }

    /// Opening restatement, if the reported figures did not balance.
    pub fn restatement(&self) -> Option<&EquityRestatement> {
        self.restatement.as_ref()
    }

    /// Projected years in order.
    pub fn periods(&self) -> &[ProjectedPeriod] {
        &self.periods
    }

    /// Number of projected years.
    pub fn horizon(&self) -> usize {
        self.periods.len()
    }

    /// Projected year `year` (1-based).
    pub fn period(&self, year: usize) -> Option<&ProjectedPeriod> {
        year.checked_sub(1).and_then(|i| self.periods.get(i))
    }

    /// Last projected year.
    pub fn final_period(&self) -> &ProjectedPeriod {
        // Non-empty: `new` requires periods.len() == horizon >= 1.
        &self.periods[self.periods.len() - 1]
    }

    /// Balance sheet at the start of `year` (1-based).
    pub fn opening_balance_for(&self, year: usize) -> Option<&BalanceSheet> {
        match year {
            0 => None,
            1 => Some(&self.opening_balance),
            n => self.periods.get(n - 2).map(|p| &p.balance),
        }
    }

    /// Free cash flow per projected year.
    pub fn free_cash_flows(&self) -> Vec<Money> {
        self.periods
            .iter()
            .map(|p| p.cash_flow.free_cash_flow)
            .collect()
    }

    /// Reference recorded on every valuation computed from this model.
    pub fn reference(&self) -> ModelReference {
        ModelReference {
            company: self.historical.company.clone(),
            fiscal_year_end: self.historical.fiscal_year_end,
            horizon: self.horizon(),
        }
    }
}
