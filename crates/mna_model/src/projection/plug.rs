//! Balance-sheet plug policies.
//!
//! After every line is projected independently, the accounting identity is
//! forced by moving one (or two) lines by the imbalance. Which line moves is
//! a modelling convention, so it is configurable.

use crate::statements::BalanceSheet;
use mna_core::types::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which balance-sheet line absorbs the imbalance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlugPolicy {
    /// Absorb into cash; a shortfall that would make cash negative is
    /// raised as long-term debt with cash floored at zero.
    #[default]
    CashThenDebt,
    /// Absorb into long-term debt; surplus beyond the outstanding balance
    /// goes to cash.
    Debt,
    /// Absorb into contributed equity (issuance or buyback).
    Equity,
}

impl fmt::Display for PlugPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlugPolicy::CashThenDebt => write!(f, "cash_then_debt"),
            PlugPolicy::Debt => write!(f, "debt"),
            PlugPolicy::Equity => write!(f, "equity"),
        }
    }
}

impl FromStr for PlugPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "cash_then_debt" | "cash" => Ok(PlugPolicy::CashThenDebt),
            "debt" => Ok(PlugPolicy::Debt),
            "equity" => Ok(PlugPolicy::Equity),
            _ => Err(format!("Unknown plug policy: {}", s)),
        }
    }
}

/// Record of the plug applied in one year.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PlugAdjustment {
    /// Policy in force
    pub policy: PlugPolicy,
    /// Assets minus liabilities and equity before the plug
    pub imbalance: Money,
    /// Change applied to cash
    pub cash: Money,
    /// Change applied to long-term debt
    pub debt: Money,
    /// Change applied to other equity
    pub equity: Money,
    /// Imbalance left after the plug
    pub residual: Money,
    /// Debt raised was cut short by the debt capacity
    pub capacity_limited: bool,
}

impl PlugAdjustment {
    /// Whether the plug moved any line.
    pub fn is_empty(&self) -> bool {
        self.cash.is_zero() && self.debt.is_zero() && self.equity.is_zero()
    }
}

/// Force `sheet` to balance under `policy`.
///
/// `debt_ceiling` caps total debt after the plug; `None` is unlimited. A
/// shortfall the ceiling cannot fund is left in `residual`.
pub(crate) fn apply(
    policy: PlugPolicy,
    sheet: &mut BalanceSheet,
    debt_ceiling: Option<Money>,
) -> PlugAdjustment {
    let imbalance = sheet.imbalance();
    // Positive surplus: funding exceeds assets.
    let surplus = -imbalance;
    let mut adj = PlugAdjustment {
        policy,
        imbalance,
        ..Default::default()
    };

    match policy {
        PlugPolicy::CashThenDebt => {
            let provisional = sheet.cash + surplus;
            if provisional >= Decimal::ZERO {
                adj.cash = surplus;
            } else {
                adj.cash = -sheet.cash;
                let (raised, limited) = raise_debt(sheet, -provisional, debt_ceiling);
                adj.debt = raised;
                adj.capacity_limited = limited;
            }
            sheet.cash += adj.cash;
            sheet.long_term_debt += adj.debt;
        }
        PlugPolicy::Debt => {
            if surplus >= Decimal::ZERO {
                let repaid = surplus.min(sheet.long_term_debt.max(Decimal::ZERO));
                adj.debt = -repaid;
                adj.cash = surplus - repaid;
            } else {
                let (raised, limited) = raise_debt(sheet, -surplus, debt_ceiling);
                adj.debt = raised;
                adj.capacity_limited = limited;
            }
            sheet.cash += adj.cash;
            sheet.long_term_debt += adj.debt;
        }
        PlugPolicy::Equity => {
            adj.equity = imbalance;
            sheet.other_equity += adj.equity;
        }
    }

    adj.residual = sheet.imbalance();
    adj
}

/// Debt to raise for `need`, limited by `ceiling`; returns (raised, limited).
fn raise_debt(sheet: &BalanceSheet, need: Money, ceiling: Option<Money>) -> (Money, bool) {
    match ceiling {
        None => (need, false),
        Some(ceiling) => {
            let headroom = (ceiling - sheet.total_debt()).max(Decimal::ZERO);
            if need > headroom {
                (headroom, true)
            } else {
                (need, false)
            }
        }
    }
}
