//! Incremental oracle: implicit Cholesky factor grown row-by-row.

use crate::matrix::KernelView;
use crate::oracle::{BuildOracle, LogDetOracle};

/// Maintains a lower-triangular factor `V` of shape `n × k_max` where row
/// `e` holds the projection of item `e` onto the committed elements:
///
/// ```text
/// V[e,j] = (L[e, S[j]] − V[e,0..j] · V[S[j],0..j]) / √d[S[j]]
/// d[e]   = L[e,e] − Σⱼ V[e,j]²   (clamped at 0)
/// ```
///
/// A gain query only extends row `e` through the columns committed since
/// its last visit, each in O(j) using rows already on file. The committed
/// row `S[j]` must have been extended through column `j` before (and it
/// has: its gain was current when it was added).
pub struct FastOracle<'m, M: KernelView> {
    matrix: &'m M,
    /// Columns of `V` filled per row.
    filled: Vec<usize>,
    filled_total: usize,
    gains: Vec<f64>,
    /// Row-major `n × k_max`.
    v: Vec<f64>,
    k_max: usize,
    solution: Vec<usize>,
    value: f64,
    log_enabled: bool,
    log: Vec<(usize, usize)>,
}

impl<'m, M: KernelView> BuildOracle<'m, M> for FastOracle<'m, M> {
    fn build(matrix: &'m M, k_max: usize, log_offdiagonals: bool) -> Self {
        let n = matrix.n();
        debug_assert!(k_max <= n);
        Self {
            matrix,
            filled: vec![0; n],
            filled_total: 0,
            gains: vec![f64::NAN; n],
            v: vec![0.0; n * k_max],
            k_max,
            solution: Vec::with_capacity(k_max),
            value: 0.0,
            log_enabled: log_offdiagonals,
            log: if log_offdiagonals {
                Vec::with_capacity(k_max * (k_max.saturating_sub(1)) / 2 + k_max * (n - k_max))
            } else {
                Vec::new()
            },
        }
    }
}

impl<M: KernelView> LogDetOracle for FastOracle<'_, M> {
    fn marginal_gain(&mut self, e: usize) -> f64 {
        debug_assert!(e < self.matrix.n());
        self.last_gain(e);

        let k = self.k_max;
        while self.filled[e] < self.solution.len() {
            let j = self.filled[e];
            let l = self.solution[j];

            let dot: f64 = self.v[e * k..e * k + j]
                .iter()
                .zip(&self.v[l * k..l * k + j])
                .map(|(a, b)| a * b)
                .sum();
            let val = (self.matrix.entry(e, l) - dot) / self.gains[l].sqrt();
            self.v[e * k + j] = val;
            self.gains[e] = (self.gains[e] - val * val).max(0.0);

            self.filled[e] += 1;
            self.filled_total += 1;
            if self.log_enabled {
                self.log.push((e, l));
            }
        }

        self.gains[e]
    }

    fn last_gain(&mut self, e: usize) -> f64 {
        debug_assert!(e < self.matrix.n());

        if self.gains[e].is_nan() {
            self.gains[e] = self.matrix.entry(e, e);
        }
        self.gains[e]
    }

    fn add(&mut self, e: usize) {
        debug_assert!(e < self.matrix.n());
        debug_assert_eq!(self.filled[e], self.solution.len());

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
        0
    }

    fn offdiagonal_count(&self) -> usize {
        self.filled_total
    }

    fn offdiagonal_log(&self) -> &[(usize, usize)] {
        &self.log
    }

    fn clear_offdiagonal_log(&mut self) {
        self.log.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::DenseMatrix;
    use crate::oracle::DirectOracle;

    fn correlated_kernel() -> DenseMatrix {
        // B with overlapping columns so off-diagonal structure matters.
        let mut b = DenseMatrix::zeros(3, 4);
        let rows = [
            [1.0, 1.0, 0.0, 0.5],
            [0.0, 1.0, 1.0, 0.5],
            [0.0, 0.0, 1.0, 1.0],
        ];
        for i in 0..3 {
            for j in 0..4 {
                b.set(i, j, rows[i][j]);
            }
        }
        b.gram()
    }

    #[test]
    fn agrees_with_direct_oracle_along_a_greedy_run() {
        let l = correlated_kernel();
        let mut fast = FastOracle::build(&l, 3, false);
        let mut direct = DirectOracle::build(&l, 3, false);

        for &pick in &[1usize, 3, 0] {
            for e in 0..4 {
                let a = fast.marginal_gain(e);
                let b = direct.marginal_gain(e);
                assert!(
                    (a - b).abs() <= 1e-9 * b.abs().max(1.0),
                    "gain mismatch at e={e}: fast={a}, direct={b}"
                );
            }
            fast.add(pick);
            direct.add(pick);
        }

        assert_eq!(fast.solution(), direct.solution());
        assert!((fast.value() - direct.value()).abs() < 1e-9);
    }

    #[test]
    fn stale_row_catches_up_over_several_commits() {
        let l = correlated_kernel();
        let mut fast = FastOracle::build(&l, 3, false);

        // Element 2 is never queried while 1 and 3 are committed.
        fast.marginal_gain(1);
        fast.add(1);
        fast.marginal_gain(3);
        fast.add(3);

        let mut direct = DirectOracle::build(&l, 3, false);
        direct.marginal_gain(1);
        direct.add(1);
        direct.marginal_gain(3);
        direct.add(3);

        let a = fast.marginal_gain(2);
        let b = direct.marginal_gain(2);
        assert!((a - b).abs() <= 1e-9 * b.abs().max(1.0));
    }

    #[test]
    fn filled_entries_counter_tracks_row_extensions() {
        let l = correlated_kernel();
        let mut fast = FastOracle::build(&l, 2, false);

        assert_eq!(fast.offdiagonal_count(), 0);
        fast.marginal_gain(0);
        fast.add(0);
        // Row 1 extends through one committed column.
        fast.marginal_gain(1);
        assert_eq!(fast.offdiagonal_count(), 1);
        // Querying again at the same size does no new work.
        fast.marginal_gain(1);
        assert_eq!(fast.offdiagonal_count(), 1);
        assert_eq!(fast.gain_evaluations(), 0);
    }

    #[test]
    fn offdiagonal_log_records_and_clears() {
        let l = correlated_kernel();
        let mut fast = FastOracle::build(&l, 2, true);

        fast.marginal_gain(0);
        fast.add(0);
        fast.marginal_gain(2);
        assert_eq!(fast.offdiagonal_log(), &[(2, 0)]);

        fast.clear_offdiagonal_log();
        assert!(fast.offdiagonal_log().is_empty());
        // The total counter is not affected by clearing the log.
        assert_eq!(fast.offdiagonal_count(), 1);
    }

    #[test]
    fn last_gain_is_the_diagonal_and_free() {
        let l = correlated_kernel();
        let mut fast = FastOracle::build(&l, 2, false);

        let g = fast.last_gain(3);
        assert!((g - l.get(3, 3)).abs() < 1e-12);
        assert_eq!(fast.offdiagonal_count(), 0);
    }
}
