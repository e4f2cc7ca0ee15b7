//! Core monetary, classification and error types.
//!
//! This module provides:
//! - `money`: `Money`/`Rate` decimal aliases, cent rounding and guarded division
//! - `classification`: growth-stage and industry tags supplied by an external classifier
//! - `error`: Structured error types for the engine and its solvers
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level.

pub mod classification;
pub mod error;
pub mod money;

pub use classification::{Classification, GrowthStage, Industry};
pub use error::{EngineError, EngineResult, SolverError};
pub use money::{
    checked_ratio, divide, round_cents, within_tolerance, Money, Rate, BALANCE_TOLERANCE, CENT,
    MAX_AMOUNT,
};
