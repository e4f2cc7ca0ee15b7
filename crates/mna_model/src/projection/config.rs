//! Projection configuration.

use super::PlugPolicy;
use mna_core::types::{EngineError, EngineResult, Rate, BALANCE_TOLERANCE};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Longest supported projection horizon in years.
pub const MAX_HORIZON: usize = 30;

/// Settings for one projection run.
///
/// # Example
///
/// ```
/// use mna_model::projection::{PlugPolicy, ProjectionConfig};
/// use rust_decimal_macros::dec;
///
/// let config = ProjectionConfig::default()
///     .with_horizon(7)
///     .with_plug_policy(PlugPolicy::Equity)
///     .with_debt_capacity(dec!(3.5));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Number of projected years (1..=30)
    pub horizon: usize,
    /// Line that absorbs any balance-sheet imbalance
    pub plug_policy: PlugPolicy,
    /// Interest rate charged on opening total debt
    pub interest_rate: Rate,
    /// Share of the working-capital gap closed each year, in [0, 1]
    pub working_capital_speed: Rate,
    /// Share of the leverage gap closed each year, in [0, 1]
    pub leverage_speed: Rate,
    /// Tolerance for both accounting identities
    pub balance_tolerance: Decimal,
    /// Cap on total debt after a plug, as a multiple of the year's EBITDA
    pub debt_capacity: Option<Decimal>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon: 5,
            plug_policy: PlugPolicy::default(),
            interest_rate: dec!(0.05),
            working_capital_speed: dec!(0.5),
            leverage_speed: dec!(0.5),
            balance_tolerance: BALANCE_TOLERANCE,
            debt_capacity: None,
        }
    }
}

impl ProjectionConfig {
    /// Set the horizon.
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set the plug policy.
    pub fn with_plug_policy(mut self, policy: PlugPolicy) -> Self {
        self.plug_policy = policy;
        self
    }

    /// Cap plugged debt at `multiple` x EBITDA.
    pub fn with_debt_capacity(mut self, multiple: Decimal) -> Self {
        self.debt_capacity = Some(multiple);
        self
    }

    /// Set the interest rate on opening debt.
    pub fn with_interest_rate(mut self, rate: Rate) -> Self {
        self.interest_rate = rate;
        self
    }

    /// Validate ranges.
    ///
    /// # Errors
    ///
    /// `Configuration` for a horizon outside 1..=30, a speed or interest rate
    /// outside [0, 1], a non-positive tolerance or a negative debt capacity.
    pub fn validate(&self) -> EngineResult<()> {
        if self.horizon == 0 || self.horizon > MAX_HORIZON {
            return Err(EngineError::configuration(format!(
                "horizon {} outside 1..={MAX_HORIZON}",
                self.horizon
            )));
        }
        for (name, value) in [
            ("interest_rate", self.interest_rate),
            ("working_capital_speed", self.working_capital_speed),
            ("leverage_speed", self.leverage_speed),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(EngineError::configuration(format!(
                    "{name} {value} outside [0, 1]"
                )));
            }
        }
        if self.balance_tolerance <= Decimal::ZERO {
            return Err(EngineError::configuration("balance_tolerance must be positive"));
        }
        if matches!(self.debt_capacity, Some(m) if m < Decimal::ZERO) {
            return Err(EngineError::configuration("debt_capacity must be non-negative"));
        }
        Ok(())
    }
}
