//! Alias resolution for heterogeneous provider payloads.

use super::{Field, HistoricalPeriod, NormalizationReport, RawFinancials};
use mna_core::types::{EngineError, EngineResult, Money, MAX_AMOUNT};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// Amortisation estimate as a share of operating income, used only when the
/// provider omits amortisation.
pub const AMORTIZATION_ESTIMATE_RATE: Decimal = dec!(0.05);

/// Normalise a provider payload into a [`HistoricalPeriod`].
///
/// # Errors
///
/// - `MissingData` naming the canonical field when revenue, shares
///   outstanding, market price or market cap is absent or zero under every
///   known alias. No default is ever substituted for a required field.
/// - `Configuration` when a resolved value exceeds [`MAX_AMOUNT`].
///
/// # Examples
///
/// ```
/// use mna_model::historical::{normalize, Field, RawFinancials};
/// use rust_decimal_macros::dec;
///
/// let raw = RawFinancials::new("Acme")
///     .with("totalRevenue", dec!(1000))
///     .with("operatingIncome", dec!(200))
///     .with("depreciation", dec!(30))
///     .with("sharesOutstanding", dec!(50))
///     .with("currentPrice", dec!(40))
///     .with("marketCap", dec!(2000));
///
/// let period = normalize(&raw).unwrap();
/// assert_eq!(period.ebitda, dec!(240)); // 200 + 30 + 5% x 200
/// assert!(period.report.amortization_estimated);
/// assert_eq!(period.report.resolved[&Field::Revenue], "totalRevenue");
/// ```
pub fn normalize(raw: &RawFinancials) -> EngineResult<HistoricalPeriod> {
    let mut report = NormalizationReport::default();
    let mut values: BTreeMap<Field, Money> = BTreeMap::new();

    for field in Field::ALL {
        match resolve(&raw.fields, field) {
            Some((alias, value)) => {
                if value.abs() > MAX_AMOUNT {
                    return Err(EngineError::configuration(format!(
                        "field '{}' ({alias}) exceeds the supported magnitude {MAX_AMOUNT}",
                        field.name()
                    )));
                }
                report.resolved.insert(field, alias.to_string());
                values.insert(field, value);
            }
            None => report.absent_fields.push(field),
        }
    }

    for field in Field::ALL.iter().filter(|f| f.is_required()) {
        let present = values.get(field).is_some_and(|v| !v.is_zero());
        if !present {
            tracing::warn!(company = %raw.company, field = field.name(), "required field missing");
            return Err(EngineError::missing_data(field.name()));
        }
    }

    let get = |field: Field| values.get(&field).copied().unwrap_or(Decimal::ZERO);

    // Providers disagree on the sign of outflows; store them positive.
    let capex = get(Field::Capex).abs();
    let depreciation = get(Field::Depreciation).abs();
    let operating_income = get(Field::OperatingIncome);

    let amortization = if report.was_supplied(Field::Amortization) {
        get(Field::Amortization).abs()
    } else {
        report.amortization_estimated = true;
        (operating_income * AMORTIZATION_ESTIMATE_RATE).max(Decimal::ZERO)
    };

    tracing::debug!(
        company = %raw.company,
        resolved = report.resolved.len(),
        absent = report.absent_fields.len(),
        amortization_estimated = report.amortization_estimated,
        "normalised historical snapshot"
    );

    Ok(HistoricalPeriod {
        company: raw.company.clone(),
        fiscal_year_end: raw.fiscal_year_end,
        revenue: get(Field::Revenue),
        cost_of_revenue: get(Field::CostOfRevenue).abs(),
        operating_income,
        interest_expense: get(Field::InterestExpense).abs(),
        tax_expense: get(Field::TaxExpense),
        net_income: get(Field::NetIncome),
        shares_outstanding: get(Field::SharesOutstanding),
        market_price: get(Field::MarketPrice),
        market_cap: get(Field::MarketCap),
        cash: get(Field::Cash),
        receivables: get(Field::Receivables),
        inventory: get(Field::Inventory),
        other_current_assets: get(Field::OtherCurrentAssets),
        net_ppe: get(Field::NetPpe),
        goodwill: get(Field::Goodwill),
        intangibles: get(Field::Intangibles),
        other_non_current_assets: get(Field::OtherNonCurrentAssets),
        payables: get(Field::Payables),
        other_current_liabilities: get(Field::OtherCurrentLiabilities),
        short_term_debt: get(Field::ShortTermDebt),
        long_term_debt: get(Field::LongTermDebt),
        other_non_current_liabilities: get(Field::OtherNonCurrentLiabilities),
        retained_earnings: get(Field::RetainedEarnings),
        total_equity: get(Field::TotalEquity),
        operating_cash_flow: get(Field::OperatingCashFlow),
        capex,
        depreciation,
        amortization,
        ebitda: operating_income + depreciation + amortization,
        report,
    })
}

/// Alias supplying `field`: the first present one, except that a required
/// field passes over zero-valued aliases to a later non-zero one.
fn resolve(fields: &BTreeMap<String, Decimal>, field: Field) -> Option<(&'static str, Decimal)> {
    let present: Vec<(&'static str, Decimal)> = field
        .aliases()
        .iter()
        .filter_map(|alias| fields.get(*alias).map(|value| (*alias, *value)))
        .collect();
    if field.is_required() {
        if let Some(found) = present.iter().find(|(_, value)| !value.is_zero()) {
            return Some(*found);
        }
    }
    present.first().copied()
}
