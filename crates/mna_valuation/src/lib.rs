//! # mna_valuation: Valuation Methods over a Linked Model
//!
//! ## Layer 3 (Valuation) Role
//!
//! mna_valuation values the company described by a
//! [`mna_model::FinancialModel`]:
//! - Discounted cash flow with sensitivity grid and scenarios (`dcf`)
//! - Leveraged buyout returns, debt schedule and exit scenarios (`lbo`)
//! - Comparable company multiples (`cca`)
//! - Merger accretion/dilution with deal risk (`merger`)
//! - Concurrent fan-out with per-method outcomes (`engine`)
//! - Football-field summary (`summary`)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           mna_valuation (L3)            │
//! ├─────────────────────────────────────────┤
//! │  dcf/ lbo/ cca/ merger/  - valuers      │
//! │  engine/   - rayon join, Outcome<T>     │
//! │  summary/  - football field             │
//! │  tables/   - stage and industry tables  │
//! │  parallel/ - rayon utilities            │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │             mna_model (L2)              │
//! │  normaliser, projector, statements      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use mna_core::types::{Classification, GrowthStage, Industry};
//! use mna_model::assumptions::defaults::for_stage;
//! use mna_model::historical::{normalize, RawFinancials};
//! use mna_model::projection::Projector;
//! use mna_valuation::{DcfParams, LboParams, ValuationEngine, ValuationRequest};
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
//! let tags = Classification::new(GrowthStage::Mature, Industry::Consumer);
//! let request = ValuationRequest::new()
//!     .with_dcf(DcfParams::new(tags))
//!     .with_lbo(LboParams::new(tags));
//! let report = ValuationEngine::new().run(&model, &request);
//!
//! assert!(report.dcf.unwrap().is_completed());
//! assert!(report.lbo.is_some());
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod cca;
pub mod dcf;
pub mod engine;
pub mod lbo;
pub mod market;
pub mod merger;
pub mod method;
pub mod outcome;
pub mod parallel;
pub mod risk;
pub mod summary;
pub mod tables;

#[cfg(test)]
mod test_support;

pub use cca::{CcaParams, CcaResult, CcaValuer, MetricBasis, Multiple, Peer};
pub use dcf::{DcfParams, DcfResult, DcfScenario, DcfValuer};
pub use engine::{MergerRequest, ValuationEngine, ValuationReport, ValuationRequest};
pub use lbo::{FinancingMix, LboParams, LboResult, LboValuer, Tranche};
pub use market::MarketAssumptions;
pub use merger::{DealConditions, MergerParams, MergerResult, MergerValuer};
pub use method::{Valuation, ValuationMethod, ValueRange};
pub use outcome::Outcome;
pub use risk::RiskLevel;
pub use summary::{FootballField, FootballFieldBar};
