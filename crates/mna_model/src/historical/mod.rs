//! Historical snapshot: provider payloads in, one canonical fiscal year out.
//!
//! - `aliases`: canonical fields and their provider aliases
//! - `normalizer`: alias resolution, required-field checks, EBITDA derivation

mod aliases;
mod normalizer;

pub use aliases::Field;
pub use normalizer::normalize;

use chrono::NaiveDate;
use mna_core::types::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provider payload: one company, one fiscal year, arbitrary field names.
///
/// # Examples
///
/// ```
/// use mna_model::historical::RawFinancials;
/// use rust_decimal_macros::dec;
///
/// let raw = RawFinancials::new("Acme")
///     .with("totalRevenue", dec!(1000))
///     .with("sharesOutstanding", dec!(50));
/// assert_eq!(raw.fields.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFinancials {
    /// Company name
    pub company: String,
    /// Fiscal year end, when the provider reports one
    #[serde(default)]
    pub fiscal_year_end: Option<NaiveDate>,
    /// Provider field name to value
    pub fields: BTreeMap<String, Decimal>,
}

impl RawFinancials {
    /// Empty payload for `company`.
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            fiscal_year_end: None,
            fields: BTreeMap::new(),
        }
    }

    /// Set the fiscal year end.
    pub fn with_fiscal_year_end(mut self, date: NaiveDate) -> Self {
        self.fiscal_year_end = Some(date);
        self
    }

    /// Add a provider field.
    pub fn with(mut self, name: impl Into<String>, value: Decimal) -> Self {
        self.fields.insert(name.into(), value);
        self
    }
}

/// Provenance of a normalised snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizationReport {
    /// Canonical field to the provider alias that supplied it
    pub resolved: BTreeMap<Field, String>,
    /// Optional fields no alias supplied; carried as zero
    pub absent_fields: Vec<Field>,
    /// Amortisation was absent and estimated from operating income
    pub amortization_estimated: bool,
}

impl NormalizationReport {
    /// Whether `field` was supplied by the provider.
    pub fn was_supplied(&self, field: Field) -> bool {
        self.resolved.contains_key(&field)
    }
}

/// One company's most recent fiscal year in canonical form.
///
/// Only [`normalize`] constructs this type outside the crate, so every value
/// has passed the required-field checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalPeriod {
    /// Company name
    pub company: String,
    /// Fiscal year end
    pub fiscal_year_end: Option<NaiveDate>,

    // Income statement
    /// Revenue
    pub revenue: Money,
    /// Cost of revenue
    pub cost_of_revenue: Money,
    /// Operating income (after depreciation and amortisation)
    pub operating_income: Money,
    /// Interest expense
    pub interest_expense: Money,
    /// Income tax expense
    pub tax_expense: Money,
    /// Net income
    pub net_income: Money,
    /// Shares outstanding
    pub shares_outstanding: Decimal,
    /// Share price
    pub market_price: Money,
    /// Market capitalisation
    pub market_cap: Money,

    // Balance sheet
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
    /// Total shareholders' equity
    pub total_equity: Money,

    // Cash flow
    /// Operating cash flow
    pub operating_cash_flow: Money,
    /// Capital expenditure (positive outflow)
    pub capex: Money,
    /// Depreciation (positive)
    pub depreciation: Money,
    /// Amortisation (positive; estimated when the report says so)
    pub amortization: Money,

    /// Operating income + depreciation + amortisation
    pub ebitda: Money,
    /// Alias resolution and estimation flags
    pub report: NormalizationReport,
}

impl HistoricalPeriod {
    /// Short-term plus long-term debt.
    pub fn total_debt(&self) -> Money {
        self.short_term_debt + self.long_term_debt
    }

    /// Total debt less cash.
    pub fn net_debt(&self) -> Money {
        self.total_debt() - self.cash
    }

    /// Operating cash flow less capex.
    pub fn free_cash_flow(&self) -> Money {
        self.operating_cash_flow - self.capex
    }

    /// Net income per share.
    pub fn eps(&self) -> Option<Decimal> {
        mna_core::types::checked_ratio(self.net_income, self.shares_outstanding)
    }
}
