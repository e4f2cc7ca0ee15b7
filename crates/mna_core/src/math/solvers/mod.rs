//! Root-finding solvers for numerical computation.
//!
//! The engine needs roots in two places: the LBO equity IRR and the
//! implied discount rate behind a target value. Both are smooth in the
//! rate, so Newton's method with an analytic derivative is sufficient.
//!
//! ## Available Solvers
//!
//! - [`NewtonRaphsonSolver`]: Quadratic convergence using derivatives, with
//!   an optional admissible interval
//!
//! ## Configuration
//!
//! [`SolverConfig`] sets:
//! - `tolerance`: Convergence tolerance (default: 1e-10)
//! - `max_iterations`: Maximum iteration count (default: 100)
//!
//! ## Decimal arithmetic
//!
//! Functions passed to the solver return `Option<Decimal>`. `None` marks a
//! point where the function is undefined or the decimal arithmetic
//! overflowed, and surfaces as `SolverError::NumericalInstability`.
//!
//! ## Examples
//!
//! ```
//! use mna_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
//! use rust_decimal_macros::dec;
//!
//! // Solve x² - 2 = 0 (find √2)
//! let solver = NewtonRaphsonSolver::new(SolverConfig::default());
//!
//! let f = |x: rust_decimal::Decimal| Some(x * x - dec!(2));
//! let f_prime = |x: rust_decimal::Decimal| Some(dec!(2) * x);
//!
//! let root = solver.find_root(f, f_prime, dec!(1)).unwrap();
//! assert!((root - dec!(1.41421356237)).abs() < dec!(0.00000001));
//! ```

mod config;
mod newton_raphson;

pub use config::SolverConfig;
pub use newton_raphson::NewtonRaphsonSolver;
