//! Plain greedy: commit the largest marginal gain, k times.

use crate::algorithm::{GreedyResult, Param, Timer, measure};
use crate::matrix::KernelView;
use crate::oracle::BuildOracle;
use crate::strategy::SelectionStrategy;

/// Greedily select up to `k` elements, recording a snapshot per step.
///
/// The classic 1−1/e-style baseline for monotone objectives. Stops early
/// (with `finished = true`) once a committed gain is zero, since the
/// objective is `−∞` from there on; stops with `finished = false` when
/// the time limit is exceeded.
pub fn greedy<'m, S, O, M>(matrix: &'m M, k: usize, param: &Param) -> GreedyResult
where
    M: KernelView,
    S: SelectionStrategy,
    O: BuildOracle<'m, M>,
{
    let n = matrix.n();
    debug_assert!(k <= n);

    let mut result = GreedyResult::with_capacity(k);
    let timer = Timer::new();

    let ground: Vec<usize> = (0..n).collect();
    let mut oracle = O::build(matrix, k, param.log_offdiagonals);
    let mut strategy = S::over(&mut oracle, &ground, false);

    for _ in 0..k {
        let Some(e) = strategy.pop_largest(&mut oracle) else {
            break;
        };
        oracle.add(e);

        let time = timer.elapsed();
        result.record(Some(e), oracle.value(), measure(time, matrix, &oracle));

        if time > param.time_limit {
            return result;
        }
        if oracle.value() == f64::NEG_INFINITY {
            // Nothing can improve a −∞ objective; the run is complete.
            result.finished = true;
            return result;
        }
        if param.log_offdiagonals {
            oracle.clear_offdiagonal_log();
        }
    }

    result.finished = true;
    result
}
