//! Solver configuration types.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Configuration for root-finding algorithms.
///
/// Provides common settings shared across solver implementations,
/// including convergence tolerance and iteration limits.
///
/// # Example
///
/// ```
/// use mna_core::math::solvers::SolverConfig;
/// use rust_decimal_macros::dec;
///
/// // Use default configuration
/// let config = SolverConfig::default();
/// assert!(config.tolerance < dec!(0.00000001));
/// assert!(config.max_iterations >= 50);
///
/// // Custom configuration
/// let custom = SolverConfig {
///     tolerance: dec!(0.000000000001),
///     max_iterations: 200,
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Convergence tolerance for root finding.
    ///
    /// The solver stops when `|f(x)| < tolerance` or the Newton step is
    /// smaller than `tolerance`.
    pub tolerance: Decimal,

    /// Maximum number of iterations before giving up.
    ///
    /// If the solver doesn't converge within this limit,
    /// it returns `SolverError::MaxIterationsExceeded`.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    /// Default values:
    /// - `tolerance`: 1e-10
    /// - `max_iterations`: 100
    fn default() -> Self {
        Self {
            tolerance: dec!(0.0000000001),
            max_iterations: 100,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with specified values.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance <= 0` or `max_iterations == 0`.
    ///
    /// # Example
    ///
    /// ```
    /// use mna_core::math::solvers::SolverConfig;
    /// use rust_decimal_macros::dec;
    ///
    /// let config = SolverConfig::new(dec!(0.000001), 200);
    /// assert_eq!(config.max_iterations, 200);
    /// ```
    pub fn new(tolerance: Decimal, max_iterations: usize) -> Self {
        assert!(tolerance > Decimal::ZERO, "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Tighter tolerance (1e-14) and more iterations (500).
    pub fn high_precision() -> Self {
        Self {
            tolerance: dec!(0.00000000000001),
            max_iterations: 500,
        }
    }

    /// Relaxed tolerance (1e-6) and fewer iterations (50).
    pub fn fast() -> Self {
        Self {
            tolerance: dec!(0.000001),
            max_iterations: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.tolerance, dec!(0.0000000001));
        assert_eq!(config.max_iterations, 100);
    }

    #[test]
    fn test_presets() {
        assert!(SolverConfig::high_precision().tolerance < SolverConfig::default().tolerance);
        assert!(SolverConfig::fast().tolerance > SolverConfig::default().tolerance);
        assert_eq!(SolverConfig::fast().max_iterations, 50);
    }

    #[test]
    #[should_panic(expected = "tolerance must be positive")]
    fn test_new_rejects_zero_tolerance() {
        SolverConfig::new(Decimal::ZERO, 10);
    }

    #[test]
    #[should_panic(expected = "max_iterations must be > 0")]
    fn test_new_rejects_zero_iterations() {
        SolverConfig::new(dec!(0.1), 0);
    }
}
