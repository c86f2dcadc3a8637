//! Double greedy: unconstrained selection via accept/reject coin flips.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::Rng;

use crate::algorithm::{Measurement, Param, RunResult, Timer};
use crate::linalg::DenseMatrix;
use crate::oracle::{BuildOracle, LogDetOracle};

/// Randomized double greedy for unconstrained non-monotone selection.
///
/// Runs two oracles in parallel: one over `L` accepting elements into
/// `S`, one over `L⁻¹` collecting the rejected complement. For each
/// element the positive parts of the two log-gains set the acceptance
/// probability `p = mg / (mg + mg⁻¹)` (1 when both vanish), and a
/// Bernoulli draw decides the side. This is the classic randomized
/// ½-approximation scheme.
///
/// The caller supplies `L⁻¹`; see [`crate::linalg::inverse`]. A singular
/// `L` has no inverse and must be rejected before getting here.
pub fn double_greedy<'m, O>(l: &'m DenseMatrix, l_inv: &'m DenseMatrix, param: &Param) -> RunResult
where
    O: BuildOracle<'m, DenseMatrix>,
{
    let n = l.rows();
    debug_assert_eq!(l.rows(), l.cols());
    debug_assert_eq!(l_inv.rows(), n);

    let timer = Timer::new();
    let mut rng = StdRng::seed_from_u64(param.seed);

    let mut accept = O::build(l, n, false);
    let mut reject = O::build(l_inv, n, false);

    for e in 0..n {
        let gain = accept.marginal_gain(e);
        let mg = if gain > 1.0 { gain.ln() } else { 0.0 };
        let gain_inv = reject.marginal_gain(e);
        let mg_inv = if gain_inv > 1.0 { gain_inv.ln() } else { 0.0 };

        let p = if mg == 0.0 && mg_inv == 0.0 {
            1.0
        } else {
            mg / (mg + mg_inv)
        };

        if rng.random_bool(p) {
            accept.add(e);
        } else {
            reject.add(e);
        }

        if timer.elapsed() > param.time_limit {
            return RunResult::unfinished();
        }
    }

    RunResult {
        finished: true,
        solution: accept.solution().to_vec(),
        value: accept.value(),
        measurement: Measurement {
            time: timer.elapsed(),
            computed_entries: 0,
            gain_evaluations: accept.gain_evaluations() + reject.gain_evaluations(),
            offdiagonal_count: accept.offdiagonal_count() + reject.offdiagonal_count(),
            offdiagonals: Vec::new(),
        },
    }
}
