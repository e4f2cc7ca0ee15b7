//! Newton-Raphson root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use rust_decimal::Decimal;

/// Derivatives smaller than this are treated as zero.
const DERIVATIVE_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 20);

/// Newton-Raphson root finder over decimals.
///
/// Uses Newton's method: `x_{n+1} = x_n - f(x_n) / f'(x_n)` for fast
/// quadratic convergence on smooth functions.
///
/// # Convergence
///
/// Newton-Raphson converges quadratically near a root, meaning the number
/// of correct digits approximately doubles each iteration. However, it may
/// fail if:
/// - The derivative is near zero
/// - The initial guess is far from the root
/// - The function is undefined somewhere along the path
///
/// # Example
///
/// ```
/// use mna_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// let solver = NewtonRaphsonSolver::new(SolverConfig::default());
///
/// // Solve x³ - x - 2 = 0
/// let f = |x: Decimal| Some(x * x * x - x - dec!(2));
/// let f_prime = |x: Decimal| Some(dec!(3) * x * x - dec!(1));
///
/// let root = solver.find_root(f, f_prime, dec!(1.5)).unwrap();
/// assert!((root * root * root - root - dec!(2)).abs() < dec!(0.0000000001));
/// ```
#[derive(Debug, Clone)]
pub struct NewtonRaphsonSolver {
    /// Solver configuration
    config: SolverConfig,
}

impl NewtonRaphsonSolver {
    /// Create a new Newton-Raphson solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Find a root of `f` using explicit derivative `f_prime`.
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - Root where `|f(x)| < tolerance` or the last step was below tolerance
    /// * `Err(SolverError::MaxIterationsExceeded)` - Failed to converge
    /// * `Err(SolverError::DerivativeNearZero)` - Derivative too small
    /// * `Err(SolverError::NumericalInstability)` - `f` or `f_prime` undefined, or overflow
    pub fn find_root<F, G>(&self, f: F, f_prime: G, x0: Decimal) -> Result<Decimal, SolverError>
    where
        F: Fn(Decimal) -> Option<Decimal>,
        G: Fn(Decimal) -> Option<Decimal>,
    {
        self.iterate(&f, &f_prime, x0, None)
    }

    /// Find a root of `f`, giving up as soon as an iterate leaves `[lower, upper]`.
    ///
    /// An escaping iterate is reported as `SolverError::OutOfBounds` with the
    /// solver reset to `x0`.
    ///
    /// # Example
    ///
    /// ```
    /// use mna_core::math::solvers::NewtonRaphsonSolver;
    /// use mna_core::types::SolverError;
    /// use rust_decimal::Decimal;
    /// use rust_decimal_macros::dec;
    ///
    /// let solver = NewtonRaphsonSolver::with_defaults();
    ///
    /// // Root at x = 5 lies outside [0, 1]
    /// let result = solver.find_root_within(
    ///     |x: Decimal| Some(x - dec!(5)),
    ///     |_| Some(dec!(1)),
    ///     dec!(0.1),
    ///     dec!(0),
    ///     dec!(1),
    /// );
    /// assert!(matches!(result, Err(SolverError::OutOfBounds { .. })));
    /// ```
    pub fn find_root_within<F, G>(
        &self,
        f: F,
        f_prime: G,
        x0: Decimal,
        lower: Decimal,
        upper: Decimal,
    ) -> Result<Decimal, SolverError>
    where
        F: Fn(Decimal) -> Option<Decimal>,
        G: Fn(Decimal) -> Option<Decimal>,
    {
        self.iterate(&f, &f_prime, x0, Some((lower, upper)))
    }

    fn iterate<F, G>(
        &self,
        f: &F,
        f_prime: &G,
        x0: Decimal,
        bounds: Option<(Decimal, Decimal)>,
    ) -> Result<Decimal, SolverError>
    where
        F: Fn(Decimal) -> Option<Decimal>,
        G: Fn(Decimal) -> Option<Decimal>,
    {
        let mut x = x0;

        for _iteration in 0..self.config.max_iterations {
            let f_val = f(x).ok_or_else(|| undefined_at("function", x))?;

            if f_val.abs() < self.config.tolerance {
                return Ok(x);
            }

            let f_prime_val = f_prime(x).ok_or_else(|| undefined_at("derivative", x))?;

            if f_prime_val.abs() < DERIVATIVE_EPSILON {
                return Err(SolverError::DerivativeNearZero { x });
            }

            let step = f_val
                .checked_div(f_prime_val)
                .ok_or_else(|| overflow("Newton step overflowed"))?;
            let next = x
                .checked_sub(step)
                .ok_or_else(|| overflow("Newton iterate overflowed"))?;

            if let Some((lower, upper)) = bounds {
                if next < lower || next > upper {
                    return Err(SolverError::OutOfBounds {
                        x: next,
                        lower,
                        upper,
                        reset_to: x0,
                    });
                }
            }

            if step.abs() < self.config.tolerance {
                return Ok(next);
            }
            x = next;
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
            last_estimate: x,
        })
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

fn undefined_at(what: &str, x: Decimal) -> SolverError {
    SolverError::NumericalInstability {
        message: format!("{what} undefined at x = {x}"),
    }
}

fn overflow(message: &str) -> SolverError {
    SolverError::NumericalInstability {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    // ========================================
    // Basic Functionality Tests
    // ========================================

    #[test]
    fn test_find_sqrt_2() {
        let solver = NewtonRaphsonSolver::new(SolverConfig::default());

        let f = |x: Decimal| Some(x * x - dec!(2));
        let f_prime = |x: Decimal| Some(dec!(2) * x);

        let root = solver.find_root(f, f_prime, dec!(1)).unwrap();
        assert!(
            (root - dec!(1.4142135623730950488)).abs() < dec!(0.0000000001),
            "Expected √2, got {}",
            root
        );
    }

    #[test]
    fn test_find_irr_like_root() {
        let solver = NewtonRaphsonSolver::with_defaults();

        // -100 + 110 / (1 + r) = 0  =>  r = 0.10
        let f = |r: Decimal| Some(dec!(-100) + dec!(110) / (Decimal::ONE + r));
        let f_prime = |r: Decimal| {
            let base = Decimal::ONE + r;
            Some(dec!(-110) / (base * base))
        };

        let root = solver.find_root(f, f_prime, dec!(0.05)).unwrap();
        assert!((root - dec!(0.10)).abs() < dec!(0.000000001));
    }

    #[test]
    fn test_linear_converges_in_one_step() {
        let solver = NewtonRaphsonSolver::with_defaults();

        let root = solver
            .find_root(|x| Some(x - dec!(1)), |_| Some(dec!(1)), dec!(0))
            .unwrap();
        assert_eq!(root, dec!(1));
    }

    // ========================================
    // Error Handling Tests
    // ========================================

    #[test]
    fn test_derivative_near_zero() {
        let solver = NewtonRaphsonSolver::with_defaults();

        let result = solver.find_root(|x| Some(x * x * x), |_| Some(Decimal::ZERO), dec!(0.5));

        match result.unwrap_err() {
            SolverError::DerivativeNearZero { x } => assert_eq!(x, dec!(0.5)),
            other => panic!("Expected DerivativeNearZero error, got {:?}", other),
        }
    }

    #[test]
    fn test_max_iterations_exceeded() {
        let solver = NewtonRaphsonSolver::new(SolverConfig::new(Decimal::new(1, 28), 3));

        let f = |x: Decimal| Some(x * x - dec!(2));
        let f_prime = |x: Decimal| Some(dec!(2) * x);

        match solver.find_root(f, f_prime, dec!(100)).unwrap_err() {
            SolverError::MaxIterationsExceeded {
                iterations,
                last_estimate,
            } => {
                assert_eq!(iterations, 3);
                assert!(last_estimate > dec!(2));
            }
            other => panic!("Expected MaxIterationsExceeded error, got {:?}", other),
        }
    }

    #[test]
    fn test_undefined_function_is_instability() {
        let solver = NewtonRaphsonSolver::with_defaults();

        let result = solver.find_root(|_| None, |_| Some(Decimal::ONE), dec!(0.1));
        assert!(matches!(
            result,
            Err(SolverError::NumericalInstability { .. })
        ));
    }

    #[test]
    fn test_out_of_bounds_resets_to_initial_guess() {
        let solver = NewtonRaphsonSolver::with_defaults();

        let result = solver.find_root_within(
            |x| Some(x + dec!(3)),
            |_| Some(Decimal::ONE),
            dec!(0.10),
            Decimal::ZERO,
            Decimal::ONE,
        );

        match result.unwrap_err() {
            SolverError::OutOfBounds {
                x,
                lower,
                upper,
                reset_to,
            } => {
                assert_eq!(x, dec!(-3));
                assert_eq!(lower, Decimal::ZERO);
                assert_eq!(upper, Decimal::ONE);
                assert_eq!(reset_to, dec!(0.10));
            }
            other => panic!("Expected OutOfBounds error, got {:?}", other),
        }
    }

    #[test]
    fn test_root_inside_bounds() {
        let solver = NewtonRaphsonSolver::with_defaults();

        let root = solver
            .find_root_within(
                |x| Some(x * x - dec!(0.25)),
                |x| Some(dec!(2) * x),
                dec!(0.4),
                Decimal::ZERO,
                Decimal::ONE,
            )
            .unwrap();
        assert!((root - dec!(0.5)).abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_config_accessor() {
        let solver = NewtonRaphsonSolver::new(SolverConfig::new(dec!(0.00000001), 50));

        assert_eq!(solver.config().tolerance, dec!(0.00000001));
        assert_eq!(solver.config().max_iterations, 50);
    }
}
