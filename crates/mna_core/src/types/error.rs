//! Error types for structured error handling.
//!
//! This module provides:
//! - `EngineError`: The six failure kinds the projection and valuation engine can raise
//! - `SolverError`: Errors from root-finding solvers
//!
//! Every error is raised at the point of detection and propagated to the
//! caller. Nothing in the engine catches one of these and continues with a
//! placeholder value.

use crate::types::money::Money;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Result alias used across the engine crates.
pub type EngineResult<T> = Result<T, EngineError>;

/// Root-finding solver errors.
///
/// Provides structured error handling for root-finding solver operations
/// with descriptive context for each failure mode.
///
/// # Variants
/// - `MaxIterationsExceeded`: Solver failed to converge within iteration limit
/// - `DerivativeNearZero`: Derivative too small for Newton-Raphson
/// - `OutOfBounds`: Iterate left the admissible interval
/// - `NumericalInstability`: Function undefined or arithmetic overflow
///
/// # Examples
/// ```
/// use mna_core::types::SolverError;
/// use rust_decimal_macros::dec;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100, last_estimate: dec!(0.1) };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations (last estimate {last_estimate})")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
        /// Iterate held when the cap was reached
        last_estimate: Decimal,
    },

    /// Derivative near zero (division by zero risk in Newton-Raphson).
    #[error("Derivative near zero at x = {x}")]
    DerivativeNearZero {
        /// The x value where derivative was near zero
        x: Decimal,
    },

    /// Iterate left the admissible interval; the solver resets and gives up.
    #[error("Iterate {x} left [{lower}, {upper}]; reset to initial guess {reset_to}")]
    OutOfBounds {
        /// The offending iterate
        x: Decimal,
        /// Lower bound of the admissible interval
        lower: Decimal,
        /// Upper bound of the admissible interval
        upper: Decimal,
        /// Initial guess the solver was reset to
        reset_to: Decimal,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {message}")]
    NumericalInstability {
        /// Description of the instability
        message: String,
    },
}

/// Engine error taxonomy.
///
/// # Variants
/// - `MissingData`: Required historical field unavailable after checking all aliases
/// - `InvalidAssumption`: Assumption out of range or sequence too short
/// - `BalanceIntegrity`: Assets differ from liabilities + equity after the plug policy
/// - `CashFlowTie`: Cash-flow-derived cash change disagrees with the balance sheet
/// - `Convergence`: Iterative solver failed
/// - `Configuration`: Inconsistent valuation inputs or a zero denominator
///
/// # Examples
/// ```
/// use mna_core::types::EngineError;
///
/// let err = EngineError::missing_data("revenue");
/// assert!(err.is_missing_data());
/// assert!(format!("{}", err).contains("revenue"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineError {
    /// Required historical field unavailable after checking all known aliases.
    #[error("Missing data: required field '{field}' is absent or zero")]
    MissingData {
        /// Canonical name of the missing field
        field: String,
    },

    /// Assumption value out of its allowed range or sequence too short.
    #[error("Invalid assumption '{field}': {reason}")]
    InvalidAssumption {
        /// Assumption field at fault
        field: String,
        /// Human-readable reason
        reason: String,
    },

    /// Balance sheet does not balance even after the plug policy.
    #[error(
        "Balance integrity violated in year {year}: assets {assets} vs liabilities + equity {liabilities_and_equity} (difference {difference})"
    )]
    BalanceIntegrity {
        /// Projection year (1-based)
        year: u32,
        /// Total assets
        assets: Money,
        /// Total liabilities plus total equity
        liabilities_and_equity: Money,
        /// Assets minus liabilities and equity
        difference: Money,
    },

    /// Cash-flow statement does not reproduce the balance-sheet cash change.
    #[error(
        "Cash flow does not tie in year {year}: statement change {cash_flow_change} vs balance sheet change {balance_sheet_change}"
    )]
    CashFlowTie {
        /// Projection year (1-based)
        year: u32,
        /// Net change in cash from the cash-flow statement
        cash_flow_change: Money,
        /// Closing minus opening cash on the balance sheet
        balance_sheet_change: Money,
    },

    /// Iterative solver did not converge.
    #[error("{context} did not converge: {source}")]
    Convergence {
        /// What was being solved (e.g. "LBO equity IRR")
        context: String,
        /// Underlying solver failure
        source: SolverError,
    },

    /// Invalid configuration, an amount outside the supported range, or a
    /// denominator that would force division by zero.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human-readable description
        message: String,
    },
}

impl EngineError {
    /// Create a missing data error.
    pub fn missing_data(field: impl Into<String>) -> Self {
        Self::MissingData {
            field: field.into(),
        }
    }

    /// Create an invalid assumption error.
    pub fn invalid_assumption(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAssumption {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a balance integrity error.
    pub fn balance_integrity(year: u32, assets: Money, liabilities_and_equity: Money) -> Self {
        Self::BalanceIntegrity {
            year,
            assets,
            liabilities_and_equity,
            difference: assets - liabilities_and_equity,
        }
    }

    /// Create a cash-flow tie error.
    pub fn cash_flow_tie(year: u32, cash_flow_change: Money, balance_sheet_change: Money) -> Self {
        Self::CashFlowTie {
            year,
            cash_flow_change,
            balance_sheet_change,
        }
    }

    /// Create a convergence error.
    pub fn convergence(context: impl Into<String>, source: SolverError) -> Self {
        Self::Convergence {
            context: context.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Short machine-readable kind, matching the serialised `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingData { .. } => "missing_data",
            Self::InvalidAssumption { .. } => "invalid_assumption",
            Self::BalanceIntegrity { .. } => "balance_integrity",
            Self::CashFlowTie { .. } => "cash_flow_tie",
            Self::Convergence { .. } => "convergence",
            Self::Configuration { .. } => "configuration",
        }
    }

    /// Check if this is a missing data error.
    pub fn is_missing_data(&self) -> bool {
        matches!(self, Self::MissingData { .. })
    }

    /// Check if this is an invalid assumption error.
    pub fn is_invalid_assumption(&self) -> bool {
        matches!(self, Self::InvalidAssumption { .. })
    }

    /// Check if this is a balance integrity error.
    pub fn is_balance_integrity(&self) -> bool {
        matches!(self, Self::BalanceIntegrity { .. })
    }

    /// Check if this is a cash-flow tie error.
    pub fn is_cash_flow_tie(&self) -> bool {
        matches!(self, Self::CashFlowTie { .. })
    }

    /// Check if this is a convergence error.
    pub fn is_convergence(&self) -> bool {
        matches!(self, Self::Convergence { .. })
    }

    /// Check if this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
