//! Canonical historical fields and the provider aliases that resolve them.
//!
//! Aliases are checked in order; the first one present wins. The lists cover
//! snake_case and camelCase API payloads, XBRL concept names from filings and
//! the labels used by common market-data vendors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A canonical field of [`HistoricalPeriod`](super::HistoricalPeriod).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Field {
    Revenue,
    CostOfRevenue,
    OperatingIncome,
    InterestExpense,
    TaxExpense,
    NetIncome,
    SharesOutstanding,
    MarketPrice,
    MarketCap,
    Cash,
    Receivables,
    Inventory,
    OtherCurrentAssets,
    NetPpe,
    Goodwill,
    Intangibles,
    OtherNonCurrentAssets,
    Payables,
    OtherCurrentLiabilities,
    ShortTermDebt,
    LongTermDebt,
    OtherNonCurrentLiabilities,
    RetainedEarnings,
    TotalEquity,
    OperatingCashFlow,
    Capex,
    Depreciation,
    Amortization,
}

impl Field {
    /// Every canonical field, in statement order.
    pub const ALL: [Field; 28] = [
        Field::Revenue,
        Field::CostOfRevenue,
        Field::OperatingIncome,
        Field::InterestExpense,
        Field::TaxExpense,
        Field::NetIncome,
        Field::SharesOutstanding,
        Field::MarketPrice,
        Field::MarketCap,
        Field::Cash,
        Field::Receivables,
        Field::Inventory,
        Field::OtherCurrentAssets,
        Field::NetPpe,
        Field::Goodwill,
        Field::Intangibles,
        Field::OtherNonCurrentAssets,
        Field::Payables,
        Field::OtherCurrentLiabilities,
        Field::ShortTermDebt,
        Field::LongTermDebt,
        Field::OtherNonCurrentLiabilities,
        Field::RetainedEarnings,
        Field::TotalEquity,
        Field::OperatingCashFlow,
        Field::Capex,
        Field::Depreciation,
        Field::Amortization,
    ];

    /// Canonical snake_case name.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Revenue => "revenue",
            Field::CostOfRevenue => "cost_of_revenue",
            Field::OperatingIncome => "operating_income",
            Field::InterestExpense => "interest_expense",
            Field::TaxExpense => "tax_expense",
            Field::NetIncome => "net_income",
            Field::SharesOutstanding => "shares_outstanding",
            Field::MarketPrice => "market_price",
            Field::MarketCap => "market_cap",
            Field::Cash => "cash",
            Field::Receivables => "receivables",
            Field::Inventory => "inventory",
            Field::OtherCurrentAssets => "other_current_assets",
            Field::NetPpe => "net_ppe",
            Field::Goodwill => "goodwill",
            Field::Intangibles => "intangibles",
            Field::OtherNonCurrentAssets => "other_non_current_assets",
            Field::Payables => "payables",
            Field::OtherCurrentLiabilities => "other_current_liabilities",
            Field::ShortTermDebt => "short_term_debt",
            Field::LongTermDebt => "long_term_debt",
            Field::OtherNonCurrentLiabilities => "other_non_current_liabilities",
            Field::RetainedEarnings => "retained_earnings",
            Field::TotalEquity => "total_equity",
            Field::OperatingCashFlow => "operating_cash_flow",
            Field::Capex => "capex",
            Field::Depreciation => "depreciation",
            Field::Amortization => "amortization",
        }
    }

    /// Fields whose absence (or zero value) fails normalisation.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Field::Revenue | Field::SharesOutstanding | Field::MarketPrice | Field::MarketCap
        )
    }

    /// Provider aliases, canonical name first.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Revenue => &[
                "revenue",
                "totalRevenue",
                "total_revenue",
                "Revenues",
                "RevenueFromContractWithCustomerExcludingAssessedTax",
                "Total Revenue",
                "sales",
            ],
            Field::CostOfRevenue => &[
                "cost_of_revenue",
                "costOfRevenue",
                "CostOfRevenue",
                "CostOfGoodsAndServicesSold",
                "Cost Of Revenue",
                "cogs",
            ],
            Field::OperatingIncome => &[
                "operating_income",
                "operatingIncome",
                "OperatingIncomeLoss",
                "Operating Income",
                "ebit",
            ],
            Field::InterestExpense => &[
                "interest_expense",
                "interestExpense",
                "InterestExpense",
                "Interest Expense",
            ],
            Field::TaxExpense => &[
                "tax_expense",
                "incomeTaxExpense",
                "IncomeTaxExpenseBenefit",
                "Tax Provision",
            ],
            Field::NetIncome => &[
                "net_income",
                "netIncome",
                "NetIncomeLoss",
                "Net Income",
            ],
            Field::SharesOutstanding => &[
                "shares_outstanding",
                "sharesOutstanding",
                "CommonStockSharesOutstanding",
                "dei:EntityCommonStockSharesOutstanding",
                "Ordinary Shares Number",
                "shares",
            ],
            Field::MarketPrice => &[
                "market_price",
                "currentPrice",
                "regularMarketPrice",
                "price",
                "close",
            ],
            Field::MarketCap => &[
                "market_cap",
                "marketCap",
                "marketCapitalization",
                "Market Cap",
            ],
            Field::Cash => &[
                "cash",
                "cashAndCashEquivalents",
                "CashAndCashEquivalentsAtCarryingValue",
                "Cash And Cash Equivalents",
            ],
            Field::Receivables => &[
                "receivables",
                "netReceivables",
                "AccountsReceivableNetCurrent",
                "Accounts Receivable",
            ],
            Field::Inventory => &["inventory", "InventoryNet", "Inventory"],
            Field::OtherCurrentAssets => &[
                "other_current_assets",
                "otherCurrentAssets",
                "OtherAssetsCurrent",
                "Other Current Assets",
            ],
            Field::NetPpe => &[
                "net_ppe",
                "propertyPlantEquipmentNet",
                "PropertyPlantAndEquipmentNet",
                "Net PPE",
            ],
            Field::Goodwill => &["goodwill", "Goodwill"],
            Field::Intangibles => &[
                "intangibles",
                "intangibleAssets",
                "IntangibleAssetsNetExcludingGoodwill",
                "Other Intangible Assets",
            ],
            Field::OtherNonCurrentAssets => &[
                "other_non_current_assets",
                "otherNonCurrentAssets",
                "OtherAssetsNoncurrent",
                "Other Non Current Assets",
            ],
            Field::Payables => &[
                "payables",
                "accountPayables",
                "accountsPayable",
                "AccountsPayableCurrent",
                "Accounts Payable",
            ],
            Field::OtherCurrentLiabilities => &[
                "other_current_liabilities",
                "otherCurrentLiabilities",
                "OtherLiabilitiesCurrent",
                "Other Current Liabilities",
            ],
            Field::ShortTermDebt => &[
                "short_term_debt",
                "shortTermDebt",
                "DebtCurrent",
                "Current Debt",
            ],
            Field::LongTermDebt => &[
                "long_term_debt",
                "longTermDebt",
                "LongTermDebtNoncurrent",
                "Long Term Debt",
            ],
            Field::OtherNonCurrentLiabilities => &[
                "other_non_current_liabilities",
                "otherNonCurrentLiabilities",
                "OtherLiabilitiesNoncurrent",
                "Other Non Current Liabilities",
            ],
            Field::RetainedEarnings => &[
                "retained_earnings",
                "retainedEarnings",
                "RetainedEarningsAccumulatedDeficit",
                "Retained Earnings",
            ],
            Field::TotalEquity => &[
                "total_equity",
                "totalStockholdersEquity",
                "StockholdersEquity",
                "Stockholders Equity",
                "equity",
            ],
            Field::OperatingCashFlow => &[
                "operating_cash_flow",
                "operatingCashFlow",
                "NetCashProvidedByUsedInOperatingActivities",
                "Operating Cash Flow",
            ],
            Field::Capex => &[
                "capex",
                "capitalExpenditure",
                "PaymentsToAcquirePropertyPlantAndEquipment",
                "Capital Expenditure",
            ],
            Field::Depreciation => &[
                "depreciation",
                "depreciationAndAmortization",
                "Depreciation",
                "DepreciationDepletionAndAmortization",
                "Depreciation And Amortization",
            ],
            Field::Amortization => &[
                "amortization",
                "amortizationOfIntangibles",
                "AmortizationOfIntangibleAssets",
                "Amortization Of Intangibles",
            ],
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
