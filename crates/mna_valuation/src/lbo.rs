//! Leveraged buyout analysis.
//!
//! A sponsor buys the company at a control premium, funds it with senior
//! and subordinated debt plus equity, services the debt from projected free
//! cash flow and exits at an EV/EBITDA multiple. The equity IRR is solved
//! with Newton-Raphson on the sponsor's cash-flow stream.

use crate::method::{Valuation, ValuationMethod, ValueRange};
use crate::outcome::Outcome;
use crate::parallel::parallel_map;
use crate::risk::RiskLevel;
use crate::tables;
use mna_core::math::cashflows::{compound, irr};
use mna_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
use mna_core::math::statistics::mean;
use mna_core::types::{
    checked_ratio, divide, within_tolerance, Classification, EngineError, EngineResult, GrowthStage,
    Money, Rate, MAX_AMOUNT,
};
use mna_model::{FinancialModel, ModelReference};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Initial guess for the equity IRR.
pub const IRR_GUESS: Rate = dec!(0.10);
/// Admissible IRR interval; an iterate outside it is non-convergence.
pub const IRR_BOUNDS: (Rate, Rate) = (Decimal::ZERO, Decimal::ONE);
/// Holding periods evaluated as exit scenarios.
pub const EXIT_YEARS: [usize; 3] = [3, 5, 7];
/// Longest supported holding period.
pub const MAX_HOLDING_YEARS: usize = 30;

/// One layer of acquisition debt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tranche {
    /// Share of the purchase price
    pub share: Rate,
    /// Annual interest rate on the opening balance
    pub rate: Rate,
    /// Years over which principal amortises in equal instalments
    pub term_years: u32,
}

/// Sources of funds as shares of the purchase price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancingMix {
    /// Senior secured debt
    pub senior: Tranche,
    /// Subordinated debt
    pub subordinated: Tranche,
    /// Sponsor equity share
    pub equity_share: Rate,
}

impl FinancingMix {
    /// Typical mix for a company at `stage`. Senior debt carries 7% over
    /// seven years; subordinated debt 11% over eight.
    pub fn for_stage(stage: GrowthStage) -> Self {
        let (senior, subordinated, equity) = match stage {
            GrowthStage::HyperGrowth => (dec!(0.25), dec!(0.10), dec!(0.65)),
            GrowthStage::HighGrowth => (dec!(0.35), dec!(0.15), dec!(0.50)),
            GrowthStage::ModerateGrowth => (dec!(0.45), dec!(0.15), dec!(0.40)),
            GrowthStage::Mature => (dec!(0.50), dec!(0.20), dec!(0.30)),
            GrowthStage::Declining => (dec!(0.40), dec!(0.15), dec!(0.45)),
        };
        Self {
            senior: Tranche {
                share: senior,
                rate: dec!(0.07),
                term_years: 7,
            },
            subordinated: Tranche {
                share: subordinated,
                rate: dec!(0.11),
                term_years: 8,
            },
            equity_share: equity,
        }
    }

    /// Debt share of the purchase price.
    pub fn debt_share(&self) -> Rate {
        self.senior.share + self.subordinated.share
    }

    /// Shares must lie in [0, 1] and sum to one; funded tranches need a term.
    ///
    /// # Errors
    ///
    /// `InvalidAssumption` naming the offending component.
    pub fn validate(&self) -> EngineResult<()> {
        for (name, tranche) in [("senior", &self.senior), ("subordinated", &self.subordinated)] {
            if tranche.share < Decimal::ZERO || tranche.share > Decimal::ONE {
                return Err(EngineError::invalid_assumption(
                    format!("financing.{name}.share"),
                    format!("{} outside [0, 1]", tranche.share),
                ));
            }
            if tranche.rate < Decimal::ZERO || tranche.rate > Decimal::ONE {
                return Err(EngineError::invalid_assumption(
                    format!("financing.{name}.rate"),
                    format!("{} outside [0, 1]", tranche.rate),
                ));
            }
            if tranche.share > Decimal::ZERO && tranche.term_years == 0 {
                return Err(EngineError::invalid_assumption(
                    format!("financing.{name}.term_years"),
                    "funded tranche needs a positive term",
                ));
            }
        }
        if self.equity_share <= Decimal::ZERO || self.equity_share > Decimal::ONE {
            return Err(EngineError::invalid_assumption(
                "financing.equity_share",
                format!("{} outside (0, 1]", self.equity_share),
            ));
        }
        let total = self.debt_share() + self.equity_share;
        if !within_tolerance(total, Decimal::ONE, dec!(0.0001)) {
            return Err(EngineError::invalid_assumption(
                "financing",
                format!("senior + subordinated + equity sum to {total}, not 1"),
            ));
        }
        Ok(())
    }
}

/// LBO inputs beyond the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LboParams {
    /// Classifier tags keying premium, mix and exit multiple
    pub classification: Classification,
    /// Purchase equity price; market cap × (1 + premium) when absent
    pub purchase_price: Option<Money>,
    /// Financing mix; the stage table when absent
    pub financing: Option<FinancingMix>,
    /// Holding period in years
    pub holding_years: usize,
    /// Exit EV/EBITDA for the main case; the stage table when absent
    pub exit_multiple: Option<Decimal>,
    /// IRR solver settings
    #[serde(skip)]
    pub solver: SolverConfig,
}

impl LboParams {
    /// Table-driven parameters with a five-year hold.
    pub fn new(classification: Classification) -> Self {
        Self {
            classification,
            purchase_price: None,
            financing: None,
            holding_years: 5,
            exit_multiple: None,
            solver: SolverConfig::default(),
        }
    }

    /// Fix the purchase price.
    pub fn with_purchase_price(mut self, price: Money) -> Self {
        self.purchase_price = Some(price);
        self
    }

    /// Use `mix` instead of the stage table.
    pub fn with_financing(mut self, mix: FinancingMix) -> Self {
        self.financing = Some(mix);
        self
    }

    /// Hold for `years`.
    pub fn with_holding_years(mut self, years: usize) -> Self {
        self.holding_years = years;
        self
    }

    /// Exit at `multiple` in the main case.
    pub fn with_exit_multiple(mut self, multiple: Decimal) -> Self {
        self.exit_multiple = Some(multiple);
        self
    }
}

/// Sources of funds at entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sources {
    /// Senior debt raised
    pub senior_debt: Money,
    /// Subordinated debt raised
    pub subordinated_debt: Money,
    /// Sponsor equity contributed
    pub sponsor_equity: Money,
}

impl Sources {
    /// Senior plus subordinated.
    pub fn total_debt(&self) -> Money {
        self.senior_debt + self.subordinated_debt
    }
}

/// One year of the debt schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduleYear {
    /// Year after entry
    pub year: u32,
    /// EBITDA (extended at terminal growth beyond the model horizon)
    pub ebitda: Money,
    /// Free cash flow available for debt service
    pub free_cash_flow: Money,
    /// Interest on opening balances
    pub interest: Money,
    /// Scheduled principal repaid
    pub principal: Money,
    /// Interest plus principal
    pub debt_service: Money,
    /// Debt outstanding at year end
    pub closing_debt: Money,
    /// Free cash flow after debt service; negative means a sponsor injection
    pub distribution: Money,
    /// Free cash flow over debt service
    pub dscr: Option<Decimal>,
}

/// Exit economics for one holding period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExitAnalysis {
    /// Years held
    pub holding_years: usize,
    /// EV/EBITDA at exit
    pub exit_multiple: Decimal,
    /// EBITDA in the exit year
    pub exit_ebitda: Money,
    /// `exit_ebitda × exit_multiple`
    pub exit_enterprise_value: Money,
    /// Debt repaid out of exit proceeds
    pub remaining_debt: Money,
    /// Equity proceeds at exit, floored at zero
    pub exit_proceeds: Money,
    /// `[−equity, d1, …, dN + proceeds]`
    pub equity_stream: Vec<Money>,
    /// Sponsor equity IRR
    pub irr: Rate,
    /// Total distributions over initial equity
    pub moic: Decimal,
}

/// Independently computed exit scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExitScenario {
    /// Years held
    pub holding_years: usize,
    /// Exit analysis or the error that stopped it
    pub outcome: Outcome<ExitAnalysis>,
}

/// Credit risk of the structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LboRisk {
    /// Entry debt over sponsor equity
    pub debt_to_equity: Decimal,
    /// Level implied by `debt_to_equity`
    pub leverage: RiskLevel,
    /// Lowest DSCR over the holding period
    pub min_dscr: Option<Decimal>,
    /// Mean DSCR over the holding period
    pub average_dscr: Option<Decimal>,
    /// Level implied by `min_dscr`
    pub coverage: RiskLevel,
}

/// Full LBO output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LboResult {
    /// Model valued
    pub model: ModelReference,
    /// Classifier tags used
    pub classification: Classification,
    /// Equity purchase price
    pub purchase_price: Money,
    /// Premium over market cap, when the market cap is positive
    pub premium: Option<Rate>,
    /// Mix used
    pub financing: FinancingMix,
    /// Sources of funds
    pub sources: Sources,
    /// Debt schedule through the longest exit scenario
    pub schedule: Vec<ScheduleYear>,
    /// Main case
    pub exit: ExitAnalysis,
    /// 3, 5 and 7 year exits
    pub exit_scenarios: Vec<ExitScenario>,
    /// Structure risk
    pub risk: LboRisk,
    /// Purchase price per share
    pub per_share: Money,
}

impl Valuation for LboResult {
    fn method(&self) -> ValuationMethod {
        ValuationMethod::Lbo
    }

    fn model(&self) -> &ModelReference {
        &self.model
    }

    fn value_range(&self) -> Option<ValueRange> {
        Some(ValueRange::point(self.per_share))
    }
}

/// LBO valuer.
#[derive(Debug, Clone)]
pub struct LboValuer {
    params: LboParams,
}

impl LboValuer {
    /// Valuer with `params`.
    pub fn new(params: LboParams) -> Self {
        Self { params }
    }

    /// Parameters in use.
    pub fn params(&self) -> &LboParams {
        &self.params
    }

    /// Analyse a buyout of the company in `model`.
    ///
    /// # Errors
    ///
    /// - `InvalidAssumption` for a financing mix that does not sum to one
    /// - `Configuration` for a non-positive price or unsupported hold
    /// - `Convergence` when the main-case IRR cannot be solved in [0, 1]
    pub fn value(&self, model: &FinancialModel) -> EngineResult<LboResult> {
        let params = &self.params;
        let stage = params.classification.growth_stage;
        let holding = params.holding_years;
        if holding == 0 || holding > MAX_HOLDING_YEARS {
            return Err(EngineError::configuration(format!(
                "holding period {holding} outside 1..={MAX_HOLDING_YEARS}"
            )));
        }

        let financing = params.financing.unwrap_or_else(|| FinancingMix::for_stage(stage));
        financing.validate()?;

        let historical = model.historical();
        let purchase_price = match params.purchase_price {
            Some(price) => price,
            None => historical.market_cap * (Decimal::ONE + tables::control_premium(stage)),
        };
        if purchase_price <= Decimal::ZERO || purchase_price > MAX_AMOUNT {
            return Err(EngineError::configuration(format!(
                "purchase price {purchase_price} outside (0, {MAX_AMOUNT}]"
            )));
        }
        let premium = if historical.market_cap > Decimal::ZERO {
            Some(purchase_price / historical.market_cap - Decimal::ONE)
        } else {
            None
        };

        let sources = Sources {
            senior_debt: purchase_price * financing.senior.share,
            subordinated_debt: purchase_price * financing.subordinated.share,
            sponsor_equity: purchase_price * financing.equity_share,
        };

        let years = holding.max(EXIT_YEARS[EXIT_YEARS.len() - 1]);
        let schedule = debt_schedule(model, &financing, &sources, stage, years)?;

        let solver = NewtonRaphsonSolver::new(params.solver);
        let main_multiple = params.exit_multiple.unwrap_or_else(|| {
            tables::lbo_exit_multiple(stage) + tables::exit_multiple_adjustment(holding)
        });
        let exit = exit_analysis(&solver, &schedule, &sources, holding, main_multiple)?;

        let exit_scenarios = parallel_map(&EXIT_YEARS, |years| {
            let multiple =
                tables::lbo_exit_multiple(stage) + tables::exit_multiple_adjustment(*years);
            let outcome = exit_analysis(&solver, &schedule, &sources, *years, multiple);
            if let Err(err) = &outcome {
                tracing::warn!(holding_years = *years, error = %err, "lbo exit scenario failed");
            }
            ExitScenario {
                holding_years: *years,
                outcome: outcome.into(),
            }
        });

        let risk = risk(&sources, &schedule[..holding]);
        let per_share = divide(purchase_price, historical.shares_outstanding, "shares outstanding")?;

        tracing::debug!(
            company = %historical.company,
            purchase_price = %purchase_price,
            irr = %exit.irr,
            moic = %exit.moic,
            "lbo valued"
        );

        Ok(LboResult {
            model: model.reference(),
            classification: params.classification,
            purchase_price,
            premium,
            financing,
            sources,
            schedule,
            exit,
            exit_scenarios,
            risk,
            per_share,
        })
    }
}

fn debt_schedule(
    model: &FinancialModel,
    financing: &FinancingMix,
    sources: &Sources,
    stage: GrowthStage,
    years: usize,
) -> EngineResult<Vec<ScheduleYear>> {
    let growth = tables::terminal_assumptions(stage).growth;
    let periods = model.periods();
    let last = model.final_period();
    let horizon = periods.len();

    let tranches = [
        (financing.senior, sources.senior_debt),
        (financing.subordinated, sources.subordinated_debt),
    ];
    let mut balances = [sources.senior_debt, sources.subordinated_debt];

    let mut schedule = Vec::with_capacity(years);
    for year in 1..=years {
        let (ebitda, free_cash_flow) = if year <= horizon {
            let period = &periods[year - 1];
            (period.income.ebitda, period.cash_flow.free_cash_flow)
        } else {
            let factor = compound(growth, (year - horizon) as u32).ok_or_else(|| {
                EngineError::configuration(format!("terminal growth {growth} is unusable"))
            })?;
            (
                last.income.ebitda * factor,
                last.cash_flow.free_cash_flow * factor,
            )
        };

        let mut interest = Decimal::ZERO;
        let mut principal = Decimal::ZERO;
        for (balance, (tranche, initial)) in balances.iter_mut().zip(tranches.iter()) {
            interest += *balance * tranche.rate;
            if tranche.term_years > 0 {
                let instalment = (*initial / Decimal::from(tranche.term_years)).min(*balance);
                principal += instalment;
                *balance -= instalment;
            }
        }
        let debt_service = interest + principal;

        schedule.push(ScheduleYear {
            year: year as u32,
            ebitda,
            free_cash_flow,
            interest,
            principal,
            debt_service,
            closing_debt: balances.iter().sum(),
            distribution: free_cash_flow - debt_service,
            dscr: checked_ratio(free_cash_flow, debt_service),
        });
    }
    Ok(schedule)
}

fn exit_analysis(
    solver: &NewtonRaphsonSolver,
    schedule: &[ScheduleYear],
    sources: &Sources,
    holding_years: usize,
    exit_multiple: Decimal,
) -> EngineResult<ExitAnalysis> {
    let held = schedule.get(..holding_years).ok_or_else(|| {
        EngineError::configuration(format!("no debt schedule for a {holding_years}-year hold"))
    })?;
    let final_year = held
        .last()
        .ok_or_else(|| EngineError::configuration("holding period is empty"))?;

    let exit_ebitda = final_year.ebitda;
    let exit_enterprise_value = exit_ebitda.checked_mul(exit_multiple).ok_or_else(|| {
        EngineError::configuration(format!(
            "exit value at {exit_multiple}x overflowed the decimal range"
        ))
    })?;
    let remaining_debt = final_year.closing_debt;
    let exit_proceeds = exit_enterprise_value
        .checked_sub(remaining_debt)
        .ok_or_else(|| EngineError::configuration("exit proceeds overflowed the decimal range"))?
        .max(Decimal::ZERO);

    let mut equity_stream = Vec::with_capacity(holding_years + 1);
    equity_stream.push(-sources.sponsor_equity);
    equity_stream.extend(held.iter().map(|y| y.distribution));
    if let Some(last) = equity_stream.last_mut() {
        *last += exit_proceeds;
    }

    let irr = irr(solver, &equity_stream, IRR_GUESS, IRR_BOUNDS.0, IRR_BOUNDS.1)
        .map_err(|source| EngineError::convergence("LBO equity IRR", source))?;
    let returned: Money = equity_stream[1..].iter().sum();
    let moic = divide(returned, sources.sponsor_equity, "sponsor equity")?;

    Ok(ExitAnalysis {
        holding_years,
        exit_multiple,
        exit_ebitda,
        exit_enterprise_value,
        remaining_debt,
        exit_proceeds,
        equity_stream,
        irr,
        moic,
    })
}

fn risk(sources: &Sources, held: &[ScheduleYear]) -> LboRisk {
    let debt_to_equity = sources.total_debt() / sources.sponsor_equity;
    let leverage = if debt_to_equity < Decimal::ONE {
        RiskLevel::Low
    } else if debt_to_equity < dec!(2) {
        RiskLevel::Moderate
    } else if debt_to_equity < dec!(3) {
        RiskLevel::High
    } else {
        RiskLevel::VeryHigh
    };

    let ratios: Vec<Decimal> = held.iter().filter_map(|y| y.dscr).collect();
    let min_dscr = ratios.iter().copied().min();
    let coverage = match min_dscr {
        None => RiskLevel::Low,
        Some(d) if d >= dec!(2) => RiskLevel::Low,
        Some(d) if d >= dec!(1.5) => RiskLevel::Moderate,
        Some(d) if d >= Decimal::ONE => RiskLevel::High,
        Some(_) => RiskLevel::VeryHigh,
    };

    LboRisk {
        debt_to_equity,
        leverage,
        min_dscr,
        average_dscr: mean(&ratios),
        coverage,
    }
}
