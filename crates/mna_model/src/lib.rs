//! # mna_model: Linked Three-Statement Model
//!
//! ## Layer 2 (Model) Role
//!
//! mna_model turns a provider payload and a set of assumptions into a
//! balanced, tied multi-year projection:
//! - Historical normalisation with provider aliases (`historical`)
//! - Assumption contract, growth-stage rule table and scenarios (`assumptions`)
//! - Income statement, balance sheet and cash-flow statement structs (`statements`)
//! - The projector and its plug policy (`projection`)
//! - The validated `FinancialModel` (`model`)
//! - Per-period ratios (`ratios`)
//!
//! ## Usage Examples
//!
//! ```rust
//! use mna_core::types::GrowthStage;
//! use mna_model::assumptions::defaults::for_stage;
//! use mna_model::historical::{normalize, RawFinancials};
//! use mna_model::projection::Projector;
//! use mna_model::ratios::ratios_for_model;
//! use rust_decimal_macros::dec;
//!
//! let raw = RawFinancials::new("Acme")
//!     .with("revenue", dec!(500))
//!     .with("operating_income", dec!(60))
//!     .with("cash", dec!(50))
//!     .with("total_equity", dec!(50))
//!     .with("shares_outstanding", dec!(10))
//!     .with("market_price", dec!(40))
//!     .with("market_cap", dec!(400));
//! let historical = normalize(&raw).unwrap();
//! let assumptions = for_stage(GrowthStage::ModerateGrowth, 5).unwrap();
//!
//! let model = Projector::with_defaults().project(&historical, &assumptions).unwrap();
//! let ratios = ratios_for_model(&model);
//! assert_eq!(ratios.len(), 6); // historical year plus five projected
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod assumptions;
pub mod historical;
pub mod model;
pub mod projection;
pub mod ratios;
pub mod statements;

pub use assumptions::{AssumptionSet, Scenario};
pub use historical::{normalize, HistoricalPeriod, RawFinancials};
pub use model::{FinancialModel, ModelReference, ProjectedPeriod};
pub use projection::{PlugPolicy, ProjectionConfig, Projector};
