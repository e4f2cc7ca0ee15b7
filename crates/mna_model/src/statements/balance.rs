//! Balance sheet.

use mna_core::types::Money;
use rust_decimal::Decimal;
use serde::Serialize;

/// Balance sheet at a period end.
///
/// Equity is split into retained earnings, which roll forward with net
/// income and dividends, and other equity (contributed capital, reserves),
/// which moves only with issuance, buybacks and equity plugs.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BalanceSheet {
    /// Cash and equivalents
    pub cash: Money,
    /// Accounts receivable
    pub receivables: Money,
    /// Inventory
    pub inventory: Money,
    /// Other current assets
    pub other_current_assets: Money,
    /// Net property, plant and equipment
    pub net_ppe: Money,
    /// Goodwill
    pub goodwill: Money,
    /// Intangible assets excluding goodwill
    pub intangibles: Money,
    /// Other non-current assets
    pub other_non_current_assets: Money,

    /// Accounts payable
    pub payables: Money,
    /// Other current liabilities
    pub other_current_liabilities: Money,
    /// Short-term debt
    pub short_term_debt: Money,
    /// Long-term debt
    pub long_term_debt: Money,
    /// Other non-current liabilities
    pub other_non_current_liabilities: Money,

    /// Retained earnings
    pub retained_earnings: Money,
    /// Contributed capital and other reserves
    pub other_equity: Money,
}

impl BalanceSheet {
    /// Current assets including cash.
    pub fn total_current_assets(&self) -> Money {
        self.cash + self.operating_current_assets()
    }

    /// Receivables, inventory and other current assets.
    pub fn operating_current_assets(&self) -> Money {
        self.receivables + self.inventory + self.other_current_assets
    }

    /// Goodwill, intangibles and other non-current assets.
    pub fn other_long_term_assets(&self) -> Money {
        self.goodwill + self.intangibles + self.other_non_current_assets
    }

    /// Total assets.
    pub fn total_assets(&self) -> Money {
        self.total_current_assets() + self.net_ppe + self.other_long_term_assets()
    }

    /// Payables and other current liabilities.
    pub fn operating_current_liabilities(&self) -> Money {
        self.payables + self.other_current_liabilities
    }

    /// Current liabilities including short-term debt.
    pub fn total_current_liabilities(&self) -> Money {
        self.operating_current_liabilities() + self.short_term_debt
    }

    /// Short-term plus long-term debt.
    pub fn total_debt(&self) -> Money {
        self.short_term_debt + self.long_term_debt
    }

    /// Total liabilities.
    pub fn total_liabilities(&self) -> Money {
        self.total_current_liabilities()
            + self.long_term_debt
            + self.other_non_current_liabilities
    }

    /// Total shareholders' equity.
    pub fn total_equity(&self) -> Money {
        self.retained_earnings + self.other_equity
    }

    /// Total liabilities plus total equity.
    pub fn total_liabilities_and_equity(&self) -> Money {
        self.total_liabilities() + self.total_equity()
    }

    /// Net operating working capital (excludes cash and debt).
    pub fn net_working_capital(&self) -> Money {
        self.operating_current_assets() - self.operating_current_liabilities()
    }

    /// Total debt less cash.
    pub fn net_debt(&self) -> Money {
        self.total_debt() - self.cash
    }

    /// Assets minus liabilities and equity; zero when balanced.
    pub fn imbalance(&self) -> Money {
        self.total_assets() - self.total_liabilities_and_equity()
    }

    /// Whether the accounting identity holds within `tolerance`.
    pub fn is_balanced(&self, tolerance: Decimal) -> bool {
        self.imbalance().abs() <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> BalanceSheet {
        BalanceSheet {
            cash: dec!(100),
            receivables: dec!(50),
            inventory: dec!(30),
            other_current_assets: dec!(20),
            net_ppe: dec!(400),
            goodwill: dec!(60),
            intangibles: dec!(40),
            other_non_current_assets: dec!(0),
            payables: dec!(45),
            other_current_liabilities: dec!(15),
            short_term_debt: dec!(25),
            long_term_debt: dec!(175),
            other_non_current_liabilities: dec!(40),
            retained_earnings: dec!(300),
            other_equity: dec!(100),
        }
    }

    #[test]
    fn test_totals() {
        let bs = sample();
        assert_eq!(bs.total_current_assets(), dec!(200));
        assert_eq!(bs.total_assets(), dec!(700));
        assert_eq!(bs.total_liabilities(), dec!(300));
        assert_eq!(bs.total_equity(), dec!(400));
        assert!(bs.is_balanced(dec!(0.01)));
    }

    #[test]
    fn test_working_capital_and_net_debt() {
        let bs = sample();
        assert_eq!(bs.net_working_capital(), dec!(40));
        assert_eq!(bs.total_debt(), dec!(200));
        assert_eq!(bs.net_debt(), dec!(100));
    }

    #[test]
    fn test_imbalance_sign() {
        let mut bs = sample();
        bs.cash += dec!(5);
        assert_eq!(bs.imbalance(), dec!(5));
        assert!(!bs.is_balanced(dec!(0.01)));
    }
}
