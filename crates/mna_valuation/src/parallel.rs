//! Rayon-based parallelisation utilities.
//!
//! Sensitivity grids and scenario sets are independent evaluations with no
//! shared mutable state, so every cell goes to the rayon pool.

use rayon::prelude::*;

/// Parallel map.
///
/// Maps each item through a function in parallel, preserving order.
pub fn parallel_map<T, R, F>(items: &[T], mapper: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    items.par_iter().map(mapper).collect()
}

/// Evaluate `f` on every (row, column) pair; the result is row-major.
pub fn grid_map<A, B, R, F>(rows: &[A], cols: &[B], f: F) -> Vec<Vec<R>>
where
    A: Sync,
    B: Sync,
    R: Send,
    F: Fn(&A, &B) -> R + Sync + Send,
{
    rows.par_iter()
        .map(|row| cols.par_iter().map(|col| f(row, col)).collect())
        .collect()
}
