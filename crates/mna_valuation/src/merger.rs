//! Merger accretion/dilution.
//!
//! Combines an acquirer and a target model year by year, phases synergies
//! in, and compares pro-forma EPS with the acquirer's standalone EPS.

use crate::method::{Valuation, ValuationMethod, ValueRange};
use crate::risk::RiskLevel;
use mna_core::types::{
    checked_ratio, divide, within_tolerance, EngineError, EngineResult, Money, Rate, MAX_AMOUNT,
};
use mna_model::{FinancialModel, ModelReference};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Cumulative share of run-rate synergies realised in years 1, 2 and 3.
pub const SYNERGY_PHASE_IN: [Rate; 3] = [dec!(0.30), dec!(0.80), dec!(1.00)];

/// Qualitative deal features that raise execution risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DealConditions {
    /// Acquirer and target in different jurisdictions
    pub cross_border: bool,
    /// Target board opposes the offer
    pub hostile: bool,
    /// Acquirer shareholders must approve
    pub shareholder_vote: bool,
}

impl DealConditions {
    fn count(&self) -> u8 {
        [self.cross_border, self.hostile, self.shareholder_vote]
            .iter()
            .filter(|c| **c)
            .count() as u8
    }
}

/// Deal terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergerParams {
    /// Equity price paid; target market cap × (1 + premium) when absent
    pub purchase_price: Option<Money>,
    /// Premium over the target's market cap
    pub premium: Rate,
    /// Share of the price paid in cash
    pub cash_fraction: Rate,
    /// Share of the price paid in acquirer stock
    pub stock_fraction: Rate,
    /// Run-rate cost synergies as a share of combined EBITDA
    pub cost_synergy_rate: Rate,
    /// Run-rate revenue synergies as a share of combined revenue
    pub revenue_synergy_rate: Rate,
    /// After-tax annual cost of the cash consideration; none when absent
    pub financing_cost_rate: Option<Rate>,
    /// Combined share of the relevant market
    pub combined_market_share: Rate,
    /// Execution risk features
    pub conditions: DealConditions,
}

impl Default for MergerParams {
    fn default() -> Self {
        Self {
            purchase_price: None,
            premium: dec!(0.30),
            cash_fraction: dec!(0.50),
            stock_fraction: dec!(0.50),
            cost_synergy_rate: dec!(0.05),
            revenue_synergy_rate: dec!(0.02),
            financing_cost_rate: None,
            combined_market_share: dec!(0.05),
            conditions: DealConditions::default(),
        }
    }
}

impl MergerParams {
    /// Ranges and the cash/stock split.
    ///
    /// # Errors
    ///
    /// `InvalidAssumption` naming the offending term.
    pub fn validate(&self) -> EngineResult<()> {
        if self.premium <= -Decimal::ONE {
            return Err(EngineError::invalid_assumption(
                "premium",
                format!("{} would make the price non-positive", self.premium),
            ));
        }
        for (name, value) in [
            ("cash_fraction", self.cash_fraction),
            ("stock_fraction", self.stock_fraction),
            ("cost_synergy_rate", self.cost_synergy_rate),
            ("revenue_synergy_rate", self.revenue_synergy_rate),
            ("combined_market_share", self.combined_market_share),
            (
                "financing_cost_rate",
                self.financing_cost_rate.unwrap_or(Decimal::ZERO),
            ),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(EngineError::invalid_assumption(
                    name,
                    format!("{value} outside [0, 1]"),
                ));
            }
        }
        let total = self.cash_fraction + self.stock_fraction;
        if !within_tolerance(total, Decimal::ONE, dec!(0.0001)) {
            return Err(EngineError::invalid_assumption(
                "consideration",
                format!("cash + stock fractions sum to {total}, not 1"),
            ));
        }
        Ok(())
    }
}

/// How the price is paid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Consideration {
    /// Cash paid
    pub cash: Money,
    /// Value paid in acquirer stock
    pub stock: Money,
    /// Acquirer shares issued at the acquirer's market price
    pub new_shares: Decimal,
}

/// Pro-forma figures for one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccretionYear {
    /// Year after close
    pub year: u32,
    /// Share of run-rate synergies realised
    pub phase_in: Rate,
    /// Cost synergies before tax
    pub cost_synergies: Money,
    /// Revenue synergies' contribution at the combined operating margin
    pub revenue_synergies: Money,
    /// Synergies after tax
    pub after_tax_synergies: Money,
    /// After-tax cost of the cash consideration
    pub financing_cost: Money,
    /// Acquirer standalone net income
    pub acquirer_net_income: Money,
    /// Target standalone net income
    pub target_net_income: Money,
    /// Combined net income
    pub pro_forma_net_income: Money,
    /// Acquirer shares plus new shares
    pub pro_forma_shares: Decimal,
    /// Acquirer standalone EPS
    pub acquirer_eps: Decimal,
    /// Combined EPS
    pub pro_forma_eps: Decimal,
    /// `(pro_forma_eps − acquirer_eps) / |acquirer_eps|`
    pub accretion: Rate,
    /// `pro_forma_eps > acquirer_eps`
    pub is_accretive: bool,
    /// Pre-tax synergies needed for zero dilution
    pub breakeven_synergies: Option<Money>,
}

/// Deal risk on four axes, each scored 1 (low) to 4.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DealRisk {
    /// Target size relative to the acquirer
    pub integration: u8,
    /// Post-deal leverage
    pub financing: u8,
    /// Combined market share
    pub regulatory: u8,
    /// Deal conditions
    pub execution: u8,
    /// Mean score
    pub average: Decimal,
    /// Overall level
    pub level: RiskLevel,
}

impl DealRisk {
    fn from_scores(integration: u8, financing: u8, regulatory: u8, execution: u8) -> Self {
        let total = u32::from(integration)
            + u32::from(financing)
            + u32::from(regulatory)
            + u32::from(execution);
        let average = Decimal::from(total) / dec!(4);
        let level = if average <= dec!(1.5) {
            RiskLevel::Low
        } else if average <= dec!(2.5) {
            RiskLevel::Moderate
        } else if average <= dec!(3.25) {
            RiskLevel::High
        } else {
            RiskLevel::VeryHigh
        };
        Self {
            integration,
            financing,
            regulatory,
            execution,
            average,
            level,
        }
    }
}

/// Full merger output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergerResult {
    /// Acquirer model
    pub acquirer: ModelReference,
    /// Target model
    pub target: ModelReference,
    /// Terms used
    pub params: MergerParams,
    /// Equity price paid
    pub purchase_price: Money,
    /// Premium over the target's market cap
    pub premium: Option<Rate>,
    /// Cash and stock split
    pub consideration: Consideration,
    /// Years 1 to 3
    pub years: Vec<AccretionYear>,
    /// Deal risk
    pub risk: DealRisk,
}

impl MergerResult {
    /// Whether every modelled year is accretive.
    pub fn accretive_throughout(&self) -> bool {
        self.years.iter().all(|y| y.is_accretive)
    }
}

impl Valuation for MergerResult {
    fn method(&self) -> ValuationMethod {
        ValuationMethod::Merger
    }

    fn model(&self) -> &ModelReference {
        &self.acquirer
    }

    fn value_range(&self) -> Option<ValueRange> {
        None
    }
}

/// Merger valuer.
#[derive(Debug, Clone, Default)]
pub struct MergerValuer {
    params: MergerParams,
}

impl MergerValuer {
    /// Valuer with `params`.
    pub fn new(params: MergerParams) -> Self {
        Self { params }
    }

    /// Terms in use.
    pub fn params(&self) -> &MergerParams {
        &self.params
    }

    /// Combine `acquirer` and `target`.
    ///
    /// # Errors
    ///
    /// - `InvalidAssumption` for out-of-range terms
    /// - `Configuration` for a zero acquirer price, a non-positive purchase
    ///   price, or a year where the acquirer's EPS is zero
    pub fn value(
        &self,
        acquirer: &FinancialModel,
        target: &FinancialModel,
    ) -> EngineResult<MergerResult> {
        let params = &self.params;
        params.validate()?;

        let a_hist = acquirer.historical();
        let t_hist = target.historical();
        if a_hist.market_price.is_zero() {
            return Err(EngineError::configuration("acquirer share price is zero"));
        }

        let purchase_price = match params.purchase_price {
            Some(price) => price,
            None => Decimal::ONE
                .checked_add(params.premium)
                .and_then(|factor| t_hist.market_cap.checked_mul(factor))
                .ok_or_else(|| {
                    EngineError::configuration("premium-implied price overflowed the decimal range")
                })?,
        };
        if purchase_price <= Decimal::ZERO || purchase_price > MAX_AMOUNT {
            return Err(EngineError::configuration(format!(
                "purchase price {purchase_price} outside (0, {MAX_AMOUNT}]"
            )));
        }
        let consideration = Consideration {
            cash: purchase_price * params.cash_fraction,
            stock: purchase_price * params.stock_fraction,
            new_shares: divide(
                purchase_price * params.stock_fraction,
                a_hist.market_price,
                "acquirer share price",
            )?,
        };

        let tax_rate = acquirer.assumptions().tax_rate;
        let financing_cost = params
            .financing_cost_rate
            .map(|rate| rate * consideration.cash)
            .unwrap_or(Decimal::ZERO);

        let horizon = SYNERGY_PHASE_IN
            .len()
            .min(acquirer.horizon())
            .min(target.horizon());
        let mut years = Vec::with_capacity(horizon);
        for (a, t) in acquirer.periods().iter().zip(target.periods()).take(horizon) {
            let (a, t) = (&a.income, &t.income);
            let phase_in = SYNERGY_PHASE_IN[years.len()];

            let combined_revenue = a.revenue + t.revenue;
            let combined_margin = checked_ratio(a.operating_income + t.operating_income, combined_revenue)
                .unwrap_or(Decimal::ZERO);
            let cost_synergies = phase_in * params.cost_synergy_rate * (a.ebitda + t.ebitda);
            let revenue_synergies =
                phase_in * params.revenue_synergy_rate * combined_revenue * combined_margin;
            let after_tax_synergies =
                (cost_synergies + revenue_synergies) * (Decimal::ONE - tax_rate);

            let standalone = a.net_income + t.net_income - financing_cost;
            let pro_forma_net_income = standalone + after_tax_synergies;
            let pro_forma_shares = a.shares_outstanding + consideration.new_shares;

            let acquirer_eps = a.eps;
            if acquirer_eps.is_zero() {
                return Err(EngineError::configuration(format!(
                    "acquirer EPS is zero in year {}; accretion is undefined",
                    years.len() + 1
                )));
            }
            let pro_forma_eps = divide(pro_forma_net_income, pro_forma_shares, "pro-forma shares")?;
            let accretion = (pro_forma_eps - acquirer_eps) / acquirer_eps.abs();

            let gap = acquirer_eps * pro_forma_shares - standalone;
            let breakeven_synergies =
                checked_ratio(gap.max(Decimal::ZERO), Decimal::ONE - tax_rate);

            years.push(AccretionYear {
                year: (years.len() + 1) as u32,
                phase_in,
                cost_synergies,
                revenue_synergies,
                after_tax_synergies,
                financing_cost,
                acquirer_net_income: a.net_income,
                target_net_income: t.net_income,
                pro_forma_net_income,
                pro_forma_shares,
                acquirer_eps,
                pro_forma_eps,
                accretion,
                is_accretive: pro_forma_eps > acquirer_eps,
                breakeven_synergies,
            });
        }

        let risk = deal_risk(params, acquirer, target, consideration.cash);
        tracing::debug!(
            acquirer = %a_hist.company,
            target = %t_hist.company,
            purchase_price = %purchase_price,
            risk = %risk.level,
            "merger valued"
        );

        Ok(MergerResult {
            acquirer: acquirer.reference(),
            target: target.reference(),
            params: params.clone(),
            purchase_price,
            premium: checked_ratio(purchase_price, t_hist.market_cap).map(|r| r - Decimal::ONE),
            consideration,
            years,
            risk,
        })
    }
}

fn deal_risk(
    params: &MergerParams,
    acquirer: &FinancialModel,
    target: &FinancialModel,
    cash_paid: Money,
) -> DealRisk {
    let a = acquirer.historical();
    let t = target.historical();

    let integration = match checked_ratio(t.revenue, a.revenue) {
        Some(r) if r < dec!(0.10) => 1,
        Some(r) if r < dec!(0.25) => 2,
        Some(r) if r < dec!(0.50) => 3,
        _ => 4,
    };

    let financing = if a.ebitda <= Decimal::ZERO {
        4
    } else {
        let leverage = (a.total_debt() + cash_paid) / a.ebitda;
        if leverage < dec!(2) {
            1
        } else if leverage < dec!(3) {
            2
        } else if leverage < dec!(4) {
            3
        } else {
            4
        }
    };

    let share = params.combined_market_share;
    let regulatory = if share < dec!(0.10) {
        1
    } else if share < dec!(0.20) {
        2
    } else if share < dec!(0.35) {
        3
    } else {
        4
    };

    let execution = (1 + params.conditions.count()).min(4);

    DealRisk::from_scores(integration, financing, regulatory, execution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{acme_model, scaled_model, zero_earnings_model};

    fn stock_deal(price: Money) -> MergerParams {
        MergerParams {
            purchase_price: Some(price),
            cash_fraction: Decimal::ZERO,
            stock_fraction: Decimal::ONE,
            revenue_synergy_rate: Decimal::ZERO,
            ..Default::default()
        }
    }

    // ========================================
    // Terms Tests
    // ========================================

    #[test]
    fn test_fractions_must_sum_to_one() {
        let params = MergerParams {
            cash_fraction: dec!(0.6),
            ..Default::default()
        };
        assert!(params.validate().unwrap_err().is_invalid_assumption());
    }

    #[test]
    fn test_default_price_applies_premium() {
        let acquirer = acme_model(5);
        let target = scaled_model("Target", dec!(0.2), 5);
        let result = MergerValuer::default().value(&acquirer, &target).unwrap();
        // 300 target market cap, 30% premium
        assert_eq!(result.purchase_price, dec!(390));
        assert_eq!(result.consideration.cash, dec!(195));
        assert_eq!(result.consideration.new_shares, dec!(13));
        assert_eq!(result.premium, Some(dec!(0.30)));
    }

    // ========================================
    // Accretion Tests
    // ========================================

    #[test]
    fn test_three_years_with_phased_synergies() {
        let acquirer = acme_model(5);
        let target = scaled_model("Target", dec!(0.2), 5);
        let result = MergerValuer::default().value(&acquirer, &target).unwrap();

        assert_eq!(result.years.len(), 3);
        let phases: Vec<_> = result.years.iter().map(|y| y.phase_in).collect();
        assert_eq!(phases, SYNERGY_PHASE_IN.to_vec());

        let first = &result.years[0];
        let a = &acquirer.period(1).unwrap().income;
        let t = &target.period(1).unwrap().income;
        assert_eq!(
            first.cost_synergies,
            dec!(0.30) * dec!(0.05) * (a.ebitda + t.ebitda)
        );
        assert_eq!(first.pro_forma_shares, dec!(113));
        assert_eq!(first.acquirer_eps, a.eps);
        assert_eq!(
            first.pro_forma_net_income,
            a.net_income + t.net_income + first.after_tax_synergies
        );
    }

    #[test]
    fn test_small_accretive_deal() {
        let result = MergerValuer::default()
            .value(&acme_model(5), &scaled_model("Target", dec!(0.2), 5))
            .unwrap();
        assert!(result.accretive_throughout());
        assert!(result.years.iter().all(|y| y.accretion > Decimal::ZERO));
        assert!(result.years.iter().all(|y| y.breakeven_synergies == Some(Decimal::ZERO)));
    }

    #[test]
    fn test_overpaying_in_stock_is_dilutive() {
        let result = MergerValuer::new(stock_deal(dec!(2000)))
            .value(&acme_model(5), &scaled_model("Target", dec!(0.2), 5))
            .unwrap();
        let first = &result.years[0];
        assert!(!first.is_accretive);
        assert!(first.accretion < Decimal::ZERO);
        assert!(first.breakeven_synergies.unwrap() > Decimal::ZERO);
    }

    #[test]
    fn test_financing_cost_reduces_pro_forma_income() {
        let acquirer = acme_model(5);
        let target = scaled_model("Target", dec!(0.2), 5);
        let without = MergerValuer::default().value(&acquirer, &target).unwrap();
        let with = MergerValuer::new(MergerParams {
            financing_cost_rate: Some(dec!(0.04)),
            ..Default::default()
        })
        .value(&acquirer, &target)
        .unwrap();
        // 4% on 195 of cash
        assert_eq!(with.years[0].financing_cost, dec!(7.8));
        assert_eq!(
            without.years[0].pro_forma_net_income - with.years[0].pro_forma_net_income,
            dec!(7.8)
        );
    }

    #[test]
    fn test_premium_overflow_is_configuration_error() {
        let params = MergerParams {
            premium: Decimal::MAX / dec!(2),
            ..Default::default()
        };
        let err = MergerValuer::new(params)
            .value(&acme_model(5), &scaled_model("Target", dec!(0.2), 5))
            .unwrap_err();
        assert!(err.is_configuration(), "got {:?}", err);
    }

    #[test]
    fn test_zero_acquirer_eps_is_configuration_error() {
        let err = MergerValuer::default()
            .value(&zero_earnings_model(), &scaled_model("Target", dec!(0.2), 5))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    // ========================================
    // Risk Tests
    // ========================================

    #[test]
    fn test_risk_scores() {
        let params = MergerParams {
            combined_market_share: dec!(0.25),
            conditions: DealConditions {
                cross_border: true,
                hostile: true,
                shareholder_vote: false,
            },
            ..Default::default()
        };
        let result = MergerValuer::new(params)
            .value(&acme_model(5), &scaled_model("Target", dec!(0.2), 5))
            .unwrap();
        let risk = result.risk;
        // Target revenue is 20% of the acquirer's
        assert_eq!(risk.integration, 2);
        // (200 debt + 195 cash) / 157.5 EBITDA
        assert_eq!(risk.financing, 2);
        assert_eq!(risk.regulatory, 3);
        assert_eq!(risk.execution, 3);
        assert_eq!(risk.average, dec!(2.5));
        assert_eq!(risk.level, RiskLevel::Moderate);
    }
}
