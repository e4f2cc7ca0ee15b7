//! Three-statement projection.
//!
//! - `config`: horizon, interest, convergence speeds, tolerance, debt capacity
//! - `plug`: swappable balancing policy
//! - `projector`: the year-by-year state machine

mod config;
mod plug;
mod projector;

pub use config::{ProjectionConfig, MAX_HORIZON};
pub use plug::{PlugAdjustment, PlugPolicy};
pub use projector::{opening_balance_sheet, Projector, MAX_GROSS_MARGIN, MAX_OPERATING_MARGIN};
