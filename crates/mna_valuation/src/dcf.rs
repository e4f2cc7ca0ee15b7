//! Discounted cash flow valuation.
//!
//! Free cash flow per projected year is discounted at a WACC built from
//! CAPM and the market-value capital structure. The terminal value blends
//! a Gordon growth perpetuity with an exit multiple on final-year free cash
//! flow, weighted [`GORDON_WEIGHT`] / [`EXIT_WEIGHT`].
//!
//! # Examples
//!
//! ```
//! use mna_core::types::{Classification, GrowthStage, Industry};
//! use mna_model::assumptions::defaults::for_stage;
//! use mna_model::historical::{normalize, RawFinancials};
//! use mna_model::projection::Projector;
//! use mna_valuation::dcf::{DcfParams, DcfValuer};
//! use rust_decimal_macros::dec;
//!
//! let raw = RawFinancials::new("Acme")
//!     .with("revenue", dec!(500))
//!     .with("operating_income", dec!(60))
//!     .with("cash", dec!(50))
//!     .with("net_ppe", dec!(100))
//!     .with("retained_earnings", dec!(150))
//!     .with("total_equity", dec!(150))
//!     .with("shares_outstanding", dec!(10))
//!     .with("market_price", dec!(40))
//!     .with("market_cap", dec!(400));
//! let historical = normalize(&raw).unwrap();
//! let assumptions = for_stage(GrowthStage::Mature, 5).unwrap();
//! let model = Projector::with_defaults().project(&historical, &assumptions).unwrap();
//!
//! let params = DcfParams::new(Classification::new(GrowthStage::Mature, Industry::Consumer));
//! let result = DcfValuer::new(params).value(&model).unwrap();
//! assert!(result.wacc > result.terminal.growth);
//! assert_eq!(result.sensitivity.cells.len(), 5);
//! ```

use crate::market::MarketAssumptions;
use crate::method::{Valuation, ValuationMethod, ValueRange};
use crate::outcome::Outcome;
use crate::parallel::{grid_map, parallel_map};
use crate::tables;
use mna_core::math::cashflows::discount_factor;
use mna_core::types::{
    checked_ratio, divide, Classification, EngineError, EngineResult, Money, Rate,
};
use mna_model::{FinancialModel, ModelReference};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;

/// Weight of the Gordon growth value in the blended terminal value.
pub const GORDON_WEIGHT: Decimal = dec!(0.6);
/// Weight of the exit-multiple value in the blended terminal value.
pub const EXIT_WEIGHT: Decimal = dec!(0.4);

/// WACC multipliers across the sensitivity grid.
pub const WACC_FACTORS: [Decimal; 5] = [dec!(0.8), dec!(0.9), dec!(1.0), dec!(1.1), dec!(1.2)];
/// Terminal growth shifts across the sensitivity grid.
pub const GROWTH_SHIFTS: [Decimal; 5] = [
    dec!(-0.01),
    dec!(-0.005),
    dec!(0),
    dec!(0.005),
    dec!(0.01),
];

/// DCF inputs beyond the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DcfParams {
    /// Classifier tags keying the beta and terminal tables
    pub classification: Classification,
    /// Market rates
    pub market: MarketAssumptions,
    /// Replaces the table beta when set
    pub beta: Option<Decimal>,
    /// Replaces the table terminal growth when set
    pub terminal_growth: Option<Rate>,
    /// Replaces the table exit multiple when set
    pub exit_multiple: Option<Decimal>,
}

impl DcfParams {
    /// Table-driven parameters at default market rates.
    pub fn new(classification: Classification) -> Self {
        Self {
            classification,
            market: MarketAssumptions::default(),
            beta: None,
            terminal_growth: None,
            exit_multiple: None,
        }
    }

    /// Use `market` rates.
    pub fn with_market(mut self, market: MarketAssumptions) -> Self {
        self.market = market;
        self
    }

    /// Override the beta.
    pub fn with_beta(mut self, beta: Decimal) -> Self {
        self.beta = Some(beta);
        self
    }

    /// Override the terminal growth rate.
    pub fn with_terminal_growth(mut self, growth: Rate) -> Self {
        self.terminal_growth = Some(growth);
        self
    }

    /// Override the exit multiple.
    pub fn with_exit_multiple(mut self, multiple: Decimal) -> Self {
        self.exit_multiple = Some(multiple);
        self
    }
}

/// Cost-of-capital build-up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiscountRate {
    /// Equity beta used
    pub beta: Decimal,
    /// CAPM cost of equity
    pub cost_of_equity: Rate,
    /// Cost of debt after tax
    pub after_tax_cost_of_debt: Rate,
    /// E / (D + E) at market value
    pub equity_weight: Rate,
    /// D / (D + E)
    pub debt_weight: Rate,
    /// Weighted average cost of capital
    pub wacc: Rate,
}

/// One discounted projection year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiscountedFlow {
    /// Projection year
    pub year: u32,
    /// Free cash flow
    pub free_cash_flow: Money,
    /// `1 / (1 + wacc)^year`
    pub discount_factor: Decimal,
    /// Discounted free cash flow
    pub present_value: Money,
}

/// Terminal value components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TerminalValue {
    /// Perpetual growth rate
    pub growth: Rate,
    /// Exit multiple on final-year free cash flow
    pub exit_multiple: Decimal,
    /// `FCF_N × (1 + g) / (wacc − g)`
    pub gordon: Money,
    /// `FCF_N × multiple`
    pub exit: Money,
    /// Weighted blend of the two
    pub blended: Money,
    /// Blend discounted to today
    pub present_value: Money,
}

/// One cell of the WACC × terminal-growth grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensitivityCell {
    /// Discount rate in this cell
    pub wacc: Rate,
    /// Terminal growth in this cell
    pub terminal_growth: Rate,
    /// Enterprise value; absent where wacc ≤ growth
    pub enterprise_value: Option<Money>,
    /// Value per share; absent where wacc ≤ growth
    pub per_share: Option<Money>,
}

/// Row-major sensitivity grid: rows vary WACC, columns vary growth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityTable {
    /// WACC per row
    pub wacc_values: Vec<Rate>,
    /// Terminal growth per column
    pub growth_values: Vec<Rate>,
    /// Cells
    pub cells: Vec<Vec<SensitivityCell>>,
}

impl SensitivityTable {
    /// Cell at (row, column).
    pub fn cell(&self, row: usize, col: usize) -> Option<&SensitivityCell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }
}

/// Preset DCF scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DcfScenario {
    /// No adjustment
    Base,
    /// Higher cash flow, cheaper capital, richer terminal value
    Upside,
    /// Lower cash flow, dearer capital, poorer terminal value
    Downside,
}

impl DcfScenario {
    /// All presets.
    pub fn all() -> [Self; 3] {
        [Self::Base, Self::Upside, Self::Downside]
    }

    /// Multipliers applied to (free cash flow, WACC, terminal value).
    pub fn multipliers(&self) -> (Decimal, Decimal, Decimal) {
        match self {
            Self::Base => (Decimal::ONE, Decimal::ONE, Decimal::ONE),
            Self::Upside => (dec!(1.15), dec!(0.95), dec!(1.10)),
            Self::Downside => (dec!(0.85), dec!(1.10), dec!(0.90)),
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Base => "Base",
            Self::Upside => "Upside",
            Self::Downside => "Downside",
        }
    }
}

impl fmt::Display for DcfScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Headline values under one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioValue {
    /// Adjusted discount rate
    pub wacc: Rate,
    /// Enterprise value
    pub enterprise_value: Money,
    /// Equity value
    pub equity_value: Money,
    /// Value per share
    pub per_share: Money,
    /// Per-share value over market price, minus one
    pub upside: Option<Rate>,
}

/// One scenario's independent outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DcfScenarioOutcome {
    /// Preset evaluated
    pub scenario: DcfScenario,
    /// Completed values or the error that stopped them
    pub outcome: Outcome<ScenarioValue>,
}

/// Full DCF output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DcfResult {
    /// Model valued
    pub model: ModelReference,
    /// Classifier tags used
    pub classification: Classification,
    /// Cost of capital
    pub discount_rate: DiscountRate,
    /// Discount rate actually applied
    pub wacc: Rate,
    /// Discounted projection years
    pub flows: Vec<DiscountedFlow>,
    /// Sum of discounted free cash flows
    pub pv_of_flows: Money,
    /// Terminal value breakdown
    pub terminal: TerminalValue,
    /// `pv_of_flows + terminal.present_value`
    pub enterprise_value: Money,
    /// Historical net debt bridged from EV to equity
    pub net_debt: Money,
    /// Enterprise value less net debt
    pub equity_value: Money,
    /// Equity value per share
    pub per_share: Money,
    /// Market price per share
    pub market_price: Money,
    /// `per_share / market_price − 1`
    pub upside: Option<Rate>,
    /// WACC × growth grid
    pub sensitivity: SensitivityTable,
    /// Base, upside and downside presets
    pub scenarios: Vec<DcfScenarioOutcome>,
}

impl DcfResult {
    /// Completed value for `scenario`.
    pub fn scenario(&self, scenario: DcfScenario) -> Option<&ScenarioValue> {
        self.scenarios
            .iter()
            .find(|s| s.scenario == scenario)
            .and_then(|s| s.outcome.result())
    }
}

impl Valuation for DcfResult {
    fn method(&self) -> ValuationMethod {
        ValuationMethod::Dcf
    }

    fn model(&self) -> &ModelReference {
        &self.model
    }

    /// Downside to upside, centred on the base case. Failed scenarios fall
    /// back to the base value.
    fn value_range(&self) -> Option<ValueRange> {
        let value = |s: DcfScenario| self.scenario(s).map(|v| v.per_share).unwrap_or(self.per_share);
        Some(ValueRange::new(
            value(DcfScenario::Downside),
            self.per_share,
            value(DcfScenario::Upside),
        ))
    }
}

/// DCF valuer.
#[derive(Debug, Clone)]
pub struct DcfValuer {
    params: DcfParams,
}

impl DcfValuer {
    /// Valuer with `params`.
    pub fn new(params: DcfParams) -> Self {
        Self { params }
    }

    /// Parameters in use.
    pub fn params(&self) -> &DcfParams {
        &self.params
    }

    /// CAPM and WACC for `model`.
    ///
    /// # Errors
    ///
    /// `Configuration` when market rates are out of range or the capital
    /// structure has no value.
    pub fn discount_rate(&self, model: &FinancialModel) -> EngineResult<DiscountRate> {
        let params = &self.params;
        params.market.validate()?;

        let stage = params.classification.growth_stage;
        let beta = params.beta.unwrap_or_else(|| {
            tables::industry_beta(params.classification.industry)
                * tables::stage_beta_multiplier(stage)
        });
        let cost_of_equity =
            params.market.risk_free_rate + beta * params.market.equity_risk_premium;
        let after_tax_cost_of_debt =
            params.market.pre_tax_cost_of_debt * (Decimal::ONE - model.assumptions().tax_rate);

        let historical = model.historical();
        let equity = historical.market_cap;
        let debt = historical.total_debt();
        let capital = equity + debt;
        if capital <= Decimal::ZERO {
            return Err(EngineError::configuration(format!(
                "capital structure has no value (equity {equity}, debt {debt})"
            )));
        }
        let equity_weight = equity / capital;
        let debt_weight = debt / capital;

        Ok(DiscountRate {
            beta,
            cost_of_equity,
            after_tax_cost_of_debt,
            equity_weight,
            debt_weight,
            wacc: equity_weight * cost_of_equity + debt_weight * after_tax_cost_of_debt,
        })
    }

    /// Value `model`.
    ///
    /// # Errors
    ///
    /// `Configuration` if WACC does not exceed terminal growth, shares are
    /// zero, or the discount rate is at or below −100%.
    pub fn value(&self, model: &FinancialModel) -> EngineResult<DcfResult> {
        let discount_rate = self.discount_rate(model)?;
        let wacc = discount_rate.wacc;

        let table = tables::terminal_assumptions(self.params.classification.growth_stage);
        let growth = self.params.terminal_growth.unwrap_or(table.growth);
        let exit_multiple = self.params.exit_multiple.unwrap_or(table.exit_multiple);

        let fcfs = model.free_cash_flows();
        let historical = model.historical();
        let net_debt = historical.net_debt();
        let shares = historical.shares_outstanding;

        let base = enterprise_value(&fcfs, wacc, growth, exit_multiple, Decimal::ONE, Decimal::ONE)?;
        let equity_value = base.enterprise_value - net_debt;
        let per_share = divide(equity_value, shares, "shares outstanding")?;

        let sensitivity = self.sensitivity(&fcfs, wacc, growth, exit_multiple, net_debt, shares);
        let scenarios = parallel_map(&DcfScenario::all(), |scenario| {
            let outcome = scenario_value(
                *scenario,
                &fcfs,
                wacc,
                growth,
                exit_multiple,
                net_debt,
                shares,
                historical.market_price,
            )
            .into();
            DcfScenarioOutcome {
                scenario: *scenario,
                outcome,
            }
        });

        tracing::debug!(
            company = %historical.company,
            wacc = %wacc,
            enterprise_value = %base.enterprise_value,
            per_share = %per_share,
            "dcf valued"
        );

        Ok(DcfResult {
            model: model.reference(),
            classification: self.params.classification,
            discount_rate,
            wacc,
            flows: base.flows,
            pv_of_flows: base.pv_of_flows,
            terminal: base.terminal,
            enterprise_value: base.enterprise_value,
            net_debt,
            equity_value,
            per_share,
            market_price: historical.market_price,
            upside: upside(per_share, historical.market_price),
            sensitivity,
            scenarios,
        })
    }

    fn sensitivity(
        &self,
        fcfs: &[Money],
        wacc: Rate,
        growth: Rate,
        exit_multiple: Decimal,
        net_debt: Money,
        shares: Decimal,
    ) -> SensitivityTable {
        let wacc_values: Vec<Rate> = WACC_FACTORS.iter().map(|f| wacc * f).collect();
        let growth_values: Vec<Rate> = GROWTH_SHIFTS.iter().map(|s| growth + s).collect();

        let cells = grid_map(&wacc_values, &growth_values, |w, g| {
            let ev = enterprise_value(fcfs, *w, *g, exit_multiple, Decimal::ONE, Decimal::ONE)
                .ok()
                .map(|b| b.enterprise_value);
            SensitivityCell {
                wacc: *w,
                terminal_growth: *g,
                enterprise_value: ev,
                per_share: ev
                    .and_then(|ev| ev.checked_sub(net_debt))
                    .and_then(|equity| checked_ratio(equity, shares)),
            }
        });

        SensitivityTable {
            wacc_values,
            growth_values,
            cells,
        }
    }
}

struct EnterpriseValue {
    flows: Vec<DiscountedFlow>,
    pv_of_flows: Money,
    terminal: TerminalValue,
    enterprise_value: Money,
}

fn enterprise_value(
    fcfs: &[Money],
    wacc: Rate,
    growth: Rate,
    exit_multiple: Decimal,
    fcf_scale: Decimal,
    terminal_scale: Decimal,
) -> EngineResult<EnterpriseValue> {
    if wacc <= growth {
        return Err(EngineError::configuration(format!(
            "WACC {wacc} does not exceed terminal growth {growth}"
        )));
    }
    let last = fcfs
        .last()
        .copied()
        .ok_or_else(|| EngineError::configuration("model has no projected years"))?;

    let mut flows = Vec::with_capacity(fcfs.len());
    for (i, fcf) in fcfs.iter().enumerate() {
        let year = i as u32 + 1;
        let factor = factor(wacc, year)?;
        let free_cash_flow = fcf
            .checked_mul(fcf_scale)
            .ok_or_else(|| overflow("scaled free cash flow"))?;
        flows.push(DiscountedFlow {
            year,
            free_cash_flow,
            discount_factor: factor,
            present_value: free_cash_flow
                .checked_mul(factor)
                .ok_or_else(|| overflow("discounted free cash flow"))?,
        });
    }
    let pv_of_flows = flows
        .iter()
        .try_fold(Decimal::ZERO, |acc, f| acc.checked_add(f.present_value))
        .ok_or_else(|| overflow("present value of flows"))?;

    let final_fcf = last
        .checked_mul(fcf_scale)
        .ok_or_else(|| overflow("final free cash flow"))?;
    let gordon = gordon_growth_value(final_fcf, wacc, growth)
        .ok_or_else(|| overflow("Gordon terminal value"))?;
    let exit = final_fcf
        .checked_mul(exit_multiple)
        .ok_or_else(|| overflow("exit terminal value"))?;
    let blended = GORDON_WEIGHT
        .checked_mul(gordon)
        .zip(EXIT_WEIGHT.checked_mul(exit))
        .and_then(|(g, e)| g.checked_add(e))
        .and_then(|b| b.checked_mul(terminal_scale))
        .ok_or_else(|| overflow("blended terminal value"))?;
    let present_value = blended
        .checked_mul(factor(wacc, fcfs.len() as u32)?)
        .ok_or_else(|| overflow("discounted terminal value"))?;
    let enterprise_value = pv_of_flows
        .checked_add(present_value)
        .ok_or_else(|| overflow("enterprise value"))?;

    Ok(EnterpriseValue {
        flows,
        pv_of_flows,
        terminal: TerminalValue {
            growth,
            exit_multiple,
            gordon,
            exit,
            blended,
            present_value,
        },
        enterprise_value,
    })
}

/// `fcf × (1 + growth) / (wacc − growth)`.
///
/// `None` when `wacc ≤ growth` or the value leaves the decimal range.
pub fn gordon_growth_value(fcf: Money, wacc: Rate, growth: Rate) -> Option<Money> {
    let spread = wacc.checked_sub(growth)?;
    if spread <= Decimal::ZERO {
        return None;
    }
    fcf.checked_mul(Decimal::ONE.checked_add(growth)?)?
        .checked_div(spread)
}

fn overflow(what: &str) -> EngineError {
    EngineError::configuration(format!("{what} overflowed the decimal range"))
}

fn factor(wacc: Rate, year: u32) -> EngineResult<Decimal> {
    discount_factor(wacc, year)
        .ok_or_else(|| EngineError::configuration(format!("discount rate {wacc} is unusable")))
}

fn upside(per_share: Money, market_price: Money) -> Option<Rate> {
    checked_ratio(per_share, market_price).map(|r| r - Decimal::ONE)
}

#[allow(clippy::too_many_arguments)]
fn scenario_value(
    scenario: DcfScenario,
    fcfs: &[Money],
    wacc: Rate,
    growth: Rate,
    exit_multiple: Decimal,
    net_debt: Money,
    shares: Decimal,
    market_price: Money,
) -> EngineResult<ScenarioValue> {
    let (fcf_scale, wacc_scale, terminal_scale) = scenario.multipliers();
    let wacc = wacc * wacc_scale;
    let ev = enterprise_value(fcfs, wacc, growth, exit_multiple, fcf_scale, terminal_scale)?;
    let equity_value = ev.enterprise_value - net_debt;
    let per_share = divide(equity_value, shares, "shares outstanding")?;
    Ok(ScenarioValue {
        wacc,
        enterprise_value: ev.enterprise_value,
        equity_value,
        per_share,
        upside: upside(per_share, market_price),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{acme_model, mature_other};

    // ========================================
    // Discount Rate Tests
    // ========================================

    #[test]
    fn test_wacc_blends_market_weights() {
        let model = acme_model(5);
        let rate = DcfValuer::new(DcfParams::new(mature_other()))
            .discount_rate(&model)
            .unwrap();

        // Other/Mature: beta 1.0, Ke = 4.5% + 5.5%
        assert_eq!(rate.beta, dec!(1.00));
        assert_eq!(rate.cost_of_equity, dec!(0.10));
        assert_eq!(rate.after_tax_cost_of_debt, dec!(0.045));
        // E 1500, D 200
        let expected = dec!(1500) / dec!(1700) * dec!(0.10) + dec!(200) / dec!(1700) * dec!(0.045);
        assert_eq!(rate.wacc, expected);
    }

    #[test]
    fn test_beta_override() {
        let model = acme_model(5);
        let rate = DcfValuer::new(DcfParams::new(mature_other()).with_beta(dec!(2)))
            .discount_rate(&model)
            .unwrap();
        assert_eq!(rate.cost_of_equity, dec!(0.155));
    }

    // ========================================
    // Valuation Tests
    // ========================================

    #[test]
    fn test_enterprise_value_components_add_up() {
        let model = acme_model(5);
        let result = DcfValuer::new(DcfParams::new(mature_other()))
            .value(&model)
            .unwrap();

        assert_eq!(result.flows.len(), 5);
        let pv: Decimal = result.flows.iter().map(|f| f.present_value).sum();
        assert_eq!(pv, result.pv_of_flows);
        assert_eq!(
            result.enterprise_value,
            result.pv_of_flows + result.terminal.present_value
        );
        assert_eq!(result.equity_value, result.enterprise_value - result.net_debt);
        assert_eq!(result.per_share, result.equity_value / dec!(100));
        for (flow, fcf) in result.flows.iter().zip(model.free_cash_flows()) {
            assert_eq!(flow.free_cash_flow, fcf);
        }
    }

    #[test]
    fn test_terminal_value_blend() {
        let model = acme_model(5);
        let result = DcfValuer::new(DcfParams::new(mature_other()))
            .value(&model)
            .unwrap();
        let t = result.terminal;
        let last = *model.free_cash_flows().last().unwrap();

        assert_eq!(t.growth, dec!(0.025));
        assert_eq!(t.exit_multiple, dec!(12));
        assert_eq!(t.gordon, last * dec!(1.025) / (result.wacc - dec!(0.025)));
        assert_eq!(t.exit, last * dec!(12));
        assert_eq!(t.blended, dec!(0.6) * t.gordon + dec!(0.4) * t.exit);
    }

    #[test]
    fn test_wacc_not_above_growth_is_configuration_error() {
        let model = acme_model(5);
        let err = DcfValuer::new(DcfParams::new(mature_other()).with_terminal_growth(dec!(0.20)))
            .value(&model)
            .unwrap_err();
        assert!(err.is_configuration());
    }

    // ========================================
    // Sensitivity and Scenario Tests
    // ========================================

    #[test]
    fn test_sensitivity_grid_shape_and_centre() {
        let model = acme_model(5);
        let result = DcfValuer::new(DcfParams::new(mature_other()))
            .value(&model)
            .unwrap();
        let table = &result.sensitivity;

        assert_eq!(table.cells.len(), 5);
        assert!(table.cells.iter().all(|row| row.len() == 5));
        let centre = table.cell(2, 2).unwrap();
        assert_eq!(centre.wacc, result.wacc);
        assert_eq!(centre.enterprise_value, Some(result.enterprise_value));
    }

    #[test]
    fn test_sensitivity_marks_undefined_cells() {
        let model = acme_model(5);
        // Growth 8.5%: the 0.8 × WACC rows fall below growth + shifts
        let result = DcfValuer::new(DcfParams::new(mature_other()).with_terminal_growth(dec!(0.085)))
            .value(&model)
            .unwrap();
        let low_wacc_high_growth = result.sensitivity.cell(0, 4).unwrap();
        assert!(low_wacc_high_growth.wacc <= low_wacc_high_growth.terminal_growth);
        assert_eq!(low_wacc_high_growth.enterprise_value, None);
        assert_eq!(low_wacc_high_growth.per_share, None);
    }

    #[test]
    fn test_scenarios_order_values() {
        let model = acme_model(5);
        let result = DcfValuer::new(DcfParams::new(mature_other()))
            .value(&model)
            .unwrap();

        let base = result.scenario(DcfScenario::Base).unwrap();
        let up = result.scenario(DcfScenario::Upside).unwrap();
        let down = result.scenario(DcfScenario::Downside).unwrap();
        assert_eq!(base.per_share, result.per_share);
        assert!(up.per_share > base.per_share);
        assert!(down.per_share < base.per_share);

        let range = result.value_range().unwrap();
        assert_eq!(range.low, down.per_share);
        assert_eq!(range.high, up.per_share);
    }

    #[test]
    fn test_gordon_growth_value() {
        assert_eq!(
            gordon_growth_value(dec!(100), dec!(0.10), dec!(0.02)),
            Some(dec!(1275))
        );
        assert_eq!(gordon_growth_value(dec!(100), dec!(0.02), dec!(0.02)), None);
    }

    #[test]
    fn test_gordon_overflow_is_none() {
        let spread = Decimal::new(1, 28);
        assert_eq!(
            gordon_growth_value(Decimal::MAX / dec!(2), dec!(0.03) + spread, dec!(0.03)),
            None
        );
    }

    #[test]
    fn test_enterprise_value_overflow_is_typed() {
        let fcfs = [Decimal::MAX / dec!(4); 3];
        let err = enterprise_value(
            &fcfs,
            dec!(0.10),
            dec!(0.02),
            dec!(12),
            Decimal::ONE,
            Decimal::ONE,
        )
        .err()
        .unwrap();
        assert!(err.is_configuration(), "got {:?}", err);
    }
}
