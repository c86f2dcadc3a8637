//! Reference oracle: fresh LDLᵀ factorization per gain query.

use crate::linalg::Ldlt;
use crate::matrix::KernelView;
use crate::oracle::{BuildOracle, LogDetOracle};

/// Recomputes `Δ(e|S) = L[e,e] − L[S,e]ᵀ L[S,S]⁻¹ L[S,e]` from scratch
/// whenever the cached value is stale. Slow but stateless between
/// queries, which makes it the correctness baseline for [`FastOracle`].
///
/// [`FastOracle`]: crate::oracle::FastOracle
pub struct DirectOracle<'m, M: KernelView> {
    matrix: &'m M,
    /// Selection size each cached gain was computed against.
    last_size: Vec<Option<usize>>,
    gains: Vec<f64>,
    solution: Vec<usize>,
    value: f64,
    evals: usize,
}

impl<'m, M: KernelView> BuildOracle<'m, M> for DirectOracle<'m, M> {
    fn build(matrix: &'m M, k_max: usize, _log_offdiagonals: bool) -> Self {
        let n = matrix.n();
        debug_assert!(k_max <= n);
        Self {
            matrix,
            last_size: vec![None; n],
            gains: vec![f64::NAN; n],
            solution: Vec::with_capacity(k_max),
            value: 0.0,
            evals: 0,
        }
    }
}

impl<M: KernelView> LogDetOracle for DirectOracle<'_, M> {
    fn marginal_gain(&mut self, e: usize) -> f64 {
        debug_assert!(e < self.matrix.n());

        let size = self.solution.len();
        if self.last_size[e].is_none_or(|u| u < size) {
            let block = self.matrix.gather_block(&self.solution, &self.solution);
            let ldlt = Ldlt::factor(&block, size);

            let rhs = self.matrix.gather_col(&self.solution, e);
            let mut x = rhs.clone();
            ldlt.solve_in_place(&mut x);
            let quad: f64 = rhs.iter().zip(&x).map(|(a, b)| a * b).sum();

            // Clamp: cancellation may push a true zero slightly negative.
            self.gains[e] = (self.matrix.entry(e, e) - quad).max(0.0);
            self.last_size[e] = Some(size);
            self.evals += 1;
        }

        self.gains[e]
    }

    fn last_gain(&mut self, e: usize) -> f64 {
        debug_assert!(e < self.matrix.n());

        if self.last_size[e].is_none() {
            self.gains[e] = self.matrix.entry(e, e);
            self.last_size[e] = Some(0);
            self.evals += 1;
        }
        self.gains[e]
    }

    fn add(&mut self, e: usize) {
        debug_assert!(e < self.matrix.n());
        debug_assert_eq!(self.last_size[e], Some(self.solution.len()));

        self.solution.push(e);
        self.value += self.gains[e].ln();
    }

    fn solution(&self) -> &[usize] {
        &self.solution
    }

    fn value(&self) -> f64 {
        self.value
    }

    fn gain_evaluations(&self) -> usize {
        self.evals
    }

    fn offdiagonal_count(&self) -> usize {
        0
    }

    fn offdiagonal_log(&self) -> &[(usize, usize)] {
        &[]
    }

    fn clear_offdiagonal_log(&mut self) {}
}
