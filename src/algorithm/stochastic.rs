//! Stochastic greedy: best element of a random sample per step.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::Rng;

use crate::algorithm::{Param, RunResult, Timer, completed_run};
use crate::matrix::KernelView;
use crate::oracle::BuildOracle;
use crate::strategy::SelectionStrategy;

/// Sub-sampling parameter: sample `⌈(n/k)·ln(1/ε)⌉` candidates per step.
const SAMPLE_EPS: f64 = 0.5;

/// Ground pool supporting O(1) removal and partial shuffling, kept as a
/// permutation of the remaining elements plus its inverse.
struct SamplePool {
    perm: Vec<usize>,
    position: Vec<usize>,
}

impl SamplePool {
    fn new(n: usize) -> Self {
        Self {
            perm: (0..n).collect(),
            position: (0..n).collect(),
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.perm.swap(i, j);
        self.position[self.perm[i]] = i;
        self.position[self.perm[j]] = j;
    }

    /// Move `e` to the tail and drop it.
    fn remove(&mut self, e: usize) {
        let last = self.perm.len() - 1;
        let pos = self.position[e];
        self.swap(pos, last);
        self.position[e] = usize::MAX;
        self.perm.pop();
    }

    /// Partial Fisher–Yates: after this, the first `count` positions hold
    /// a uniform sample without replacement.
    fn partial_shuffle(&mut self, count: usize, rng: &mut StdRng) {
        let n = self.perm.len();
        for i in 0..count {
            let j = rng.random_range(i..n);
            self.swap(i, j);
        }
    }

    fn sample(&self, count: usize) -> &[usize] {
        &self.perm[..count]
    }
}

/// Stochastic greedy (lazier-than-lazy): each step samples
/// `⌈(n/k)·ln(1/ε)⌉` remaining elements, builds a throwaway strategy over
/// the sample, and commits its best element. Expected quality approaches
/// plain greedy while the oracle only ever sees the samples.
pub fn stochastic_greedy<'m, S, O, M>(matrix: &'m M, k: usize, param: &Param) -> RunResult
where
    M: KernelView,
    S: SelectionStrategy,
    O: BuildOracle<'m, M>,
{
    let n = matrix.n();
    debug_assert!(k <= n);

    let timer = Timer::new();
    let mut rng = StdRng::seed_from_u64(param.seed);
    let sample_size = ((n as f64 / k as f64) * (1.0 / SAMPLE_EPS).ln()).ceil() as usize;

    let mut oracle = O::build(matrix, k, param.log_offdiagonals);
    let mut pool = SamplePool::new(n);

    for _ in 0..k {
        let count = sample_size.min(n - oracle.solution().len());
        pool.partial_shuffle(count, &mut rng);

        let mut strategy = S::over(&mut oracle, pool.sample(count), false);
        if let Some(e) = strategy.pop_largest(&mut oracle) {
            oracle.add(e);
            pool.remove(e);
        }

        if timer.elapsed() > param.time_limit {
            return RunResult::unfinished();
        }
    }

    completed_run(&timer, matrix, &oracle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::DenseMatrix;
    use crate::oracle::{DirectOracle, FastOracle};
    use crate::strategy::{LazyStrategy, NonLazyStrategy};

    #[test]
    fn pool_removal_keeps_permutation_consistent() {
        let mut pool = SamplePool::new(5);
        pool.remove(2);
        assert_eq!(pool.perm.len(), 4);
        assert!(!pool.perm.contains(&2));
        for (pos, &e) in pool.perm.iter().enumerate() {
            assert_eq!(pool.position[e], pos);
        }
    }

    #[test]
    fn full_sample_reduces_to_plain_greedy() {
        // n/k small enough that every step samples the whole pool.
        let l = DenseMatrix::from_diag(&[0.3, 0.2, 0.9, 0.5]);
        let param = Param::default();

        let result = stochastic_greedy::<NonLazyStrategy, DirectOracle<_>, _>(&l, 4, &param);
        assert!(result.finished);
        let mut sorted = result.solution.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
    }

    #[test]
    fn same_seed_reproduces_the_run() {
        let l = DenseMatrix::from_diag(&[1.5, 3.0, 2.0, 5.0, 1.2, 0.4, 2.5, 0.9]);
        let param = Param {
            seed: 1234,
            ..Param::default()
        };

        let a = stochastic_greedy::<LazyStrategy, FastOracle<_>, _>(&l, 3, &param);
        let b = stochastic_greedy::<LazyStrategy, FastOracle<_>, _>(&l, 3, &param);
        assert_eq!(a.solution, b.solution);
        assert_eq!(a.value, b.value);
    }

    #[test]
    fn all_combinations_agree_for_a_fixed_seed() {
        let l = DenseMatrix::from_diag(&[1.5, 3.0, 2.0, 5.0, 1.2, 0.4, 2.5, 0.9]);
        let param = Param {
            seed: 5,
            ..Param::default()
        };

        let reference = stochastic_greedy::<NonLazyStrategy, DirectOracle<_>, _>(&l, 4, &param);
        let lazy_direct = stochastic_greedy::<LazyStrategy, DirectOracle<_>, _>(&l, 4, &param);
        let nonlazy_fast = stochastic_greedy::<NonLazyStrategy, FastOracle<_>, _>(&l, 4, &param);
        let lazy_fast = stochastic_greedy::<LazyStrategy, FastOracle<_>, _>(&l, 4, &param);

        assert_eq!(reference.solution, lazy_direct.solution);
        assert_eq!(reference.solution, nonlazy_fast.solution);
        assert_eq!(reference.solution, lazy_fast.solution);
    }

    #[test]
    fn zero_budget_is_the_empty_run() {
        let b = DenseMatrix::zeros(3, 0);
        let l = b.gram();
        let result = stochastic_greedy::<LazyStrategy, FastOracle<_>, _>(&l, 0, &Param::default());
        assert!(result.finished);
        assert!(result.solution.is_empty());
        assert_eq!(result.value, 0.0);
    }
}
