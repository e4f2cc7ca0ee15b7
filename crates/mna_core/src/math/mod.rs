//! Numerical building blocks: root finding, discounting and sample statistics.

pub mod cashflows;
pub mod solvers;
pub mod statistics;
