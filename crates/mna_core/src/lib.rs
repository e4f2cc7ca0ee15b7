//! # mna_core: Numerical Foundation for the M&A Valuation Engine
//!
//! ## Layer 1 (Foundation) Role
//!
//! mna_core is the bottom layer of the engine workspace, providing:
//! - Decimal money and rate aliases with rounding and guarded division (`types::money`)
//! - Growth-stage and industry classification tags (`types::classification`)
//! - The engine error taxonomy: `EngineError`, `SolverError` (`types::error`)
//! - Newton-Raphson root finding over decimals (`math::solvers`)
//! - Discounting and NPV helpers (`math::cashflows`)
//! - Summary statistics for peer multiples (`math::statistics`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other mna_* crates, with minimal external dependencies:
//! - rust_decimal: 96-bit decimal arithmetic, so accounting identities hold to the cent
//! - thiserror: Error derivation
//! - serde: Serialisation of every record the engine emits
//!
//! ## Usage Examples
//!
//! ```rust
//! use mna_core::math::cashflows::npv;
//! use mna_core::types::{round_cents, GrowthStage};
//! use rust_decimal_macros::dec;
//!
//! let flows = [dec!(-100), dec!(60), dec!(60)];
//! let value = npv(dec!(0.10), &flows).unwrap();
//! assert_eq!(round_cents(value), dec!(4.13));
//!
//! assert_eq!(GrowthStage::Mature.name(), "Mature");
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;

pub use types::{EngineError, EngineResult, Money, Rate, SolverError};
