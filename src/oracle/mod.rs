//! Marginal-gain oracles for the log-determinant objective.
//!
//! For a selection `S` and candidate `e`, the exponential marginal gain is
//!
//! ```text
//! Δ(e|S) = det L[S∪{e}, S∪{e}] / det L[S, S]
//!        = L[e,e] − L[S,e]ᵀ · L[S,S]⁻¹ · L[S,e]
//! ```
//!
//! (the Schur complement; non-negative on PSD kernels). Adding `e` then
//! bumps the running objective by `ln Δ(e|S)`.
//!
//! Two implementations share one contract but trade accuracy bookkeeping
//! for speed:
//!
//! - [`DirectOracle`]: refactors `L[S,S]` from scratch per query. O(|S|³)
//!   a call, no state to go stale — the reference implementation.
//! - [`FastOracle`]: grows an implicit Cholesky factor row-by-row, so a
//!   query only pays for the columns added to `S` since it last looked.
//!   Amortized O(n·|S|) per greedy step.
//!
//! Both clamp residuals at zero: floating-point cancellation can push a
//! true zero slightly negative, and a zero gain (`ln 0 = −∞`) is the
//! legitimate signal that `e` adds nothing.

mod direct;
mod fast;

pub use direct::DirectOracle;
pub use fast::FastOracle;

use crate::matrix::KernelView;

/// Query/update interface shared by both oracles.
///
/// Cached gains are tracked per element together with the selection size
/// they were computed against; [`LogDetOracle::add`] requires the gain of
/// the added element to be current (checked in debug builds).
pub trait LogDetOracle {
    /// Marginal gain of `e` against the current selection, recomputing
    /// (or catching up) the cached value if stale.
    fn marginal_gain(&mut self, e: usize) -> f64;

    /// Last computed gain of `e`, lazily initialized to `L[e,e]` (the
    /// gain against the empty selection) on first access.
    fn last_gain(&mut self, e: usize) -> f64;

    /// Commit `e`: append to the selection and add `ln Δ(e|S)` to the
    /// objective. The gain of `e` must be current.
    fn add(&mut self, e: usize);

    /// Committed elements in accept order.
    fn solution(&self) -> &[usize];

    /// Running objective `log det L[S,S]` (`−∞` once a zero gain was
    /// committed).
    fn value(&self) -> f64;

    /// Number of from-scratch gain evaluations (0 for [`FastOracle`],
    /// whose work is counted per filled factor entry instead).
    fn gain_evaluations(&self) -> usize;

    /// Number of off-diagonal factor entries filled so far (0 for
    /// [`DirectOracle`]).
    fn offdiagonal_count(&self) -> usize;

    /// Positions `(element, committed)` of filled off-diagonals since the
    /// last clear, if logging was enabled at construction.
    fn offdiagonal_log(&self) -> &[(usize, usize)];

    /// Drop the accumulated off-diagonal log.
    fn clear_offdiagonal_log(&mut self);
}

/// Construction seam tying an oracle to the kernel view it reads.
///
/// `k_max` bounds the selection size and drives preallocation; an oracle
/// serves exactly one algorithm run.
pub trait BuildOracle<'m, M: KernelView>: LogDetOracle + Sized {
    fn build(matrix: &'m M, k_max: usize, log_offdiagonals: bool) -> Self;
}
