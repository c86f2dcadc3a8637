//! Interlace greedy: four coupled chains over a shared ground set.

use crate::algorithm::result::ChainStep;
use crate::algorithm::{InterlaceResult, Measurement, Param, Timer};
use crate::matrix::KernelView;
use crate::oracle::{BuildOracle, LogDetOracle};
use crate::strategy::SelectionStrategy;

/// One interlaced round for a pair of chains: A commits its best element
/// and bars it from B's ground set, then B does the same towards A. A
/// `None` pop (dummy winner) commits nothing and bars nothing.
fn interlace_pair<S, O>(
    strategy_a: &mut S,
    strategy_b: &mut S,
    oracle_a: &mut O,
    oracle_b: &mut O,
) -> (Option<usize>, Option<usize>)
where
    S: SelectionStrategy,
    O: LogDetOracle,
{
    let e_a = strategy_a.pop_largest(oracle_a);
    if let Some(e) = e_a {
        oracle_a.add(e);
        strategy_b.remove(e);
    }

    let e_b = strategy_b.pop_largest(oracle_b);
    if let Some(e) = e_b {
        oracle_b.add(e);
        strategy_a.remove(e);
    }

    (e_a, e_b)
}

/// Interlace greedy for the non-monotone case: chains 0/1 interlace from
/// the start; chains 2/3 first pick independently (so both may grab the
/// same head element) and interlace from round 1 on. All chains use
/// dummy elements, so a chain stalls once its best remaining gain drops
/// to 1. The returned snapshots pick the best chain prefix per round.
pub fn interlace_greedy<'m, S, O, M>(matrix: &'m M, k: usize, param: &Param) -> InterlaceResult
where
    M: KernelView,
    S: SelectionStrategy,
    O: BuildOracle<'m, M>,
{
    let n = matrix.n();
    debug_assert!(k <= n);

    let mut result = InterlaceResult::with_capacity(k);
    let timer = Timer::new();
    let ground: Vec<usize> = (0..n).collect();

    let mut oracle_0 = O::build(matrix, k, param.log_offdiagonals);
    let mut oracle_1 = O::build(matrix, k, param.log_offdiagonals);
    let mut oracle_2 = O::build(matrix, k, param.log_offdiagonals);
    let mut oracle_3 = O::build(matrix, k, param.log_offdiagonals);

    let mut strategy_0 = S::over(&mut oracle_0, &ground, true);
    let mut strategy_1 = S::over(&mut oracle_1, &ground, true);
    let mut strategy_2 = S::over(&mut oracle_2, &ground, true);
    let mut strategy_3 = S::over(&mut oracle_3, &ground, true);

    for round in 0..k {
        let (e_0, e_1) = interlace_pair(
            &mut strategy_0,
            &mut strategy_1,
            &mut oracle_0,
            &mut oracle_1,
        );

        let (e_2, e_3) = if round == 0 {
            // Both tail chains open independently; no cross-removal yet.
            let e_2 = strategy_2.pop_largest(&mut oracle_2);
            if let Some(e) = e_2 {
                oracle_2.add(e);
            }
            let e_3 = strategy_3.pop_largest(&mut oracle_3);
            if let Some(e) = e_3 {
                oracle_3.add(e);
            }
            (e_2, e_3)
        } else {
            interlace_pair(
                &mut strategy_2,
                &mut strategy_3,
                &mut oracle_2,
                &mut oracle_3,
            )
        };

        let time = timer.elapsed();
        result.record(
            [
                ChainStep {
                    element: e_0,
                    value: oracle_0.value(),
                },
                ChainStep {
                    element: e_1,
                    value: oracle_1.value(),
                },
                ChainStep {
                    element: e_2,
                    value: oracle_2.value(),
                },
                ChainStep {
                    element: e_3,
                    value: oracle_3.value(),
                },
            ],
            Measurement {
                time,
                computed_entries: matrix.computed_entries(),
                gain_evaluations: oracle_0.gain_evaluations()
                    + oracle_1.gain_evaluations()
                    + oracle_2.gain_evaluations()
                    + oracle_3.gain_evaluations(),
                offdiagonal_count: oracle_0.offdiagonal_count()
                    + oracle_1.offdiagonal_count()
                    + oracle_2.offdiagonal_count()
                    + oracle_3.offdiagonal_count(),
                offdiagonals: Vec::new(),
            },
        );

        if time > param.time_limit {
            return result;
        }
    }

    result.finished = true;
    result
}
