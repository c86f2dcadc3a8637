//! detmax: greedy MAP inference for determinantal point processes.
//!
//! Given a symmetric positive semidefinite kernel `L` of order `n`,
//! select a subset `S ⊆ {0, …, n−1}` that (approximately) maximizes the
//! log-determinant objective `f(S) = log det L[S,S]` — the standard
//! proxy for picking a diverse, high-quality subset under a DPP model.
//!
//! # Which Algorithm Should I Use?
//!
//! | Situation | Recommendation |
//! |-----------|----------------|
//! | Monotone regime, cardinality budget | [`greedy`] |
//! | Non-monotone, cardinality budget | [`random_greedy`] or [`interlace_greedy`] |
//! | Large `n`, approximate is fine | [`stochastic_greedy`] |
//! | No constraint at all | [`double_greedy`] (needs `L⁻¹`) |
//!
//! Every driver is generic over two orthogonal choices:
//!
//! - **Oracle** — how marginal gains are computed. [`DirectOracle`]
//!   refactors the selected principal submatrix per query (O(|S|³),
//!   the accuracy baseline); [`FastOracle`] maintains an incremental
//!   Cholesky factor and pays O(|S|) per stale row (amortized
//!   O(n·|S|) per step).
//! - **Strategy** — how the next element is found. [`NonLazyStrategy`]
//!   rescans everything; [`LazyStrategy`] exploits submodularity to
//!   skip recomputation via a stale-upper-bound heap.
//!
//! All four combinations produce identical selections on the same
//! input; they differ only in cost profile.
//!
//! The kernel itself sits behind [`KernelView`]: either a materialized
//! [`DenseMatrix`] or a [`GramCache`] that computes entries of
//! `L = BᵀB` on demand and counts how many were ever needed — the
//! interesting number when comparing oracle variants.
//!
//! # Example
//!
//! ```
//! use detmax::{greedy, DenseMatrix, FastOracle, LazyStrategy, Param};
//!
//! let l = DenseMatrix::from_diag(&[0.3, 0.2, 0.9, 0.5, 0.25, 0.125, 0.1, 2.0]);
//! let result = greedy::<LazyStrategy, FastOracle<_>, _>(&l, 4, &Param::default());
//!
//! assert!(result.finished);
//! assert_eq!(result.last().solution, vec![7, 2, 3, 0]);
//! ```
//!
//! # Numerical Policy
//!
//! Marginal gains are Schur complements and cannot be negative on PSD
//! inputs, but floating-point cancellation can push a true zero slightly
//! below it; every such residual is clamped at 0 before it feeds a
//! `ln`, a square root, or a further subtraction. A zero gain is
//! legitimate: committing it drives the objective to `−∞`, which is
//! recorded as-is and ends the run.

pub mod algorithm;
pub mod error;
pub mod io;
pub mod linalg;
pub mod matrix;
pub mod oracle;
pub mod strategy;
pub mod synth;

// Re-exports
pub use algorithm::{
    GreedyResult, InterlaceResult, Measurement, Param, RunResult, Timer, double_greedy, greedy,
    interlace_greedy, random_greedy, stochastic_greedy,
};
pub use error::{Result, SelectError};
pub use linalg::DenseMatrix;
pub use matrix::{GramCache, KernelView};
pub use oracle::{BuildOracle, DirectOracle, FastOracle, LogDetOracle};
pub use strategy::{LazyStrategy, NonLazyStrategy, SelectionStrategy};
