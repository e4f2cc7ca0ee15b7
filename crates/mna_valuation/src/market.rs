//! Capital-market inputs shared by the valuers.

use mna_core::types::{EngineError, EngineResult, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Market-wide rates used to build discount rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketAssumptions {
    /// Risk-free rate
    pub risk_free_rate: Rate,
    /// Equity market risk premium
    pub equity_risk_premium: Rate,
    /// Pre-tax cost of debt
    pub pre_tax_cost_of_debt: Rate,
}

impl Default for MarketAssumptions {
    fn default() -> Self {
        Self {
            risk_free_rate: dec!(0.045),
            equity_risk_premium: dec!(0.055),
            pre_tax_cost_of_debt: dec!(0.06),
        }
    }
}

impl MarketAssumptions {
    /// Each rate must lie in [0, 1].
    pub fn validate(&self) -> EngineResult<()> {
        for (name, value) in [
            ("risk_free_rate", self.risk_free_rate),
            ("equity_risk_premium", self.equity_risk_premium),
            ("pre_tax_cost_of_debt", self.pre_tax_cost_of_debt),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(EngineError::configuration(format!(
                    "{name} {value} outside [0, 1]"
                )));
            }
        }
        Ok(())
    }
}
