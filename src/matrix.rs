//! Read-only views over a PSD kernel matrix.
//!
//! The oracles never see a concrete matrix type; they work against
//! [`KernelView`], which offers scalar and bulk reads plus a counter of
//! genuinely computed entries. Two implementations:
//!
//! - [`DenseMatrix`]: fully materialized, every read is O(1), counter
//!   stays 0.
//! - [`GramCache`]: a deferred Gram matrix `L = BᵀB` over a borrowed
//!   `d × n` factor. Entries are materialized on first touch, mirrored
//!   across the diagonal, and counted once per unordered pair.
//!
//! Views are single-owner and not thread-safe; `GramCache` mutates its
//! backing store behind a `RefCell` so that reads stay `&self` and one
//! view can serve several oracles in the same run.

use std::cell::{Cell, RefCell};

use crate::linalg::DenseMatrix;

/// Read access to a symmetric `n × n` kernel.
///
/// Bulk accessors default to entry-by-entry reads, which is exactly the
/// behavior the caching view wants: each distinct underlying pair is
/// computed once no matter which accessor touches it first.
pub trait KernelView {
    /// Matrix order `n` (rows == cols).
    fn n(&self) -> usize;

    /// `L[i, j]`.
    fn entry(&self, i: usize, j: usize) -> f64;

    /// Number of entries computed so far (0 for materialized views).
    fn computed_entries(&self) -> usize {
        0
    }

    /// Full column `j`, forcing materialization of every `L[i, j]`.
    fn col(&self, j: usize) -> Vec<f64> {
        (0..self.n()).map(|i| self.entry(i, j)).collect()
    }

    /// `L[rows, j]` as a vector in `rows` order.
    fn gather_col(&self, rows: &[usize], j: usize) -> Vec<f64> {
        rows.iter().map(|&i| self.entry(i, j)).collect()
    }

    /// `L[rows, cols]` as a row-major `rows.len() × cols.len()` buffer.
    fn gather_block(&self, rows: &[usize], cols: &[usize]) -> Vec<f64> {
        let mut out = Vec::with_capacity(rows.len() * cols.len());
        for &i in rows {
            for &j in cols {
                out.push(self.entry(i, j));
            }
        }
        out
    }
}

impl KernelView for DenseMatrix {
    fn n(&self) -> usize {
        debug_assert_eq!(self.rows(), self.cols());
        self.cols()
    }

    #[inline]
    fn entry(&self, i: usize, j: usize) -> f64 {
        self.get(i, j)
    }
}

/// Deferred Gram matrix `BᵀB` with per-entry caching.
///
/// `computed_entries` counts dot products actually performed; the entry
/// written by symmetry is free.
pub struct GramCache<'b> {
    factor: &'b DenseMatrix,
    cache: RefCell<Vec<f64>>,
    computed: Cell<usize>,
}

impl<'b> GramCache<'b> {
    /// Wrap a `d × n` factor; the `n × n` backing store starts empty.
    #[must_use]
    pub fn new(factor: &'b DenseMatrix) -> Self {
        let n = factor.cols();
        Self {
            factor,
            // NaN marks a not-yet-computed entry.
            cache: RefCell::new(vec![f64::NAN; n * n]),
            computed: Cell::new(0),
        }
    }
}

impl KernelView for GramCache<'_> {
    fn n(&self) -> usize {
        self.factor.cols()
    }

    fn entry(&self, i: usize, j: usize) -> f64 {
        let n = self.n();
        debug_assert!(i < n && j < n);

        let mut cache = self.cache.borrow_mut();
        let cached = cache[i * n + j];
        if !cached.is_nan() {
            return cached;
        }

        let v = self.factor.col_dot(i, j);
        cache[i * n + j] = v;
        cache[j * n + i] = v;
        self.computed.set(self.computed.get() + 1);
        v
    }

    fn computed_entries(&self) -> usize {
        self.computed.get()
    }
}
