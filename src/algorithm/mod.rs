//! Greedy drivers for log-determinant subset selection.
//!
//! Every driver composes an oracle and a strategy over the ground set
//! `{0, …, n−1}`, commits one element per step, and records a
//! [`Measurement`] from wall time and the oracle/view counters. The
//! drivers differ in how the next element is chosen:
//!
//! | Driver | Constraint | Choice per step |
//! |---|---|---|
//! | [`greedy`] | cardinality ≤ k | largest gain |
//! | [`random_greedy`] | cardinality ≤ k | uniformly random rank among the top `k` |
//! | [`stochastic_greedy`] | cardinality ≤ k | largest gain within a random sample |
//! | [`interlace_greedy`] | cardinality ≤ k | four coupled chains, best prefix wins |
//! | [`double_greedy`] | none | Bernoulli accept/reject against `L⁻¹` |
//!
//! Time limits are checked at step boundaries only; an exceeded limit
//! yields `finished = false`. A committed zero gain drives the objective
//! to `−∞` and ends the run early with `finished = true`.

mod double;
mod interlace;
mod plain;
mod random;
mod result;
mod stochastic;

pub use double::double_greedy;
pub use interlace::interlace_greedy;
pub use plain::greedy;
pub use random::random_greedy;
pub use result::{GreedyResult, InterlaceResult, Measurement, RunResult};
pub use stochastic::stochastic_greedy;

use std::time::Instant;

use crate::matrix::KernelView;
use crate::oracle::LogDetOracle;

/// Run parameters shared by all drivers.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Wall-clock budget in seconds; checked after each step.
    pub time_limit: f64,
    /// Seed for the per-run RNG.
    pub seed: u64,
    /// Record `(element, committed)` positions for every filled factor
    /// off-diagonal.
    pub log_offdiagonals: bool,
}

impl Default for Param {
    fn default() -> Self {
        Self {
            time_limit: f64::INFINITY,
            seed: 0,
            log_offdiagonals: false,
        }
    }
}

/// Wall-clock stopwatch started at construction.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Seconds elapsed since construction.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the counters for a single-oracle driver.
pub(crate) fn measure<M: KernelView, O: LogDetOracle>(time: f64, matrix: &M, oracle: &O) -> Measurement {
    Measurement {
        time,
        computed_entries: matrix.computed_entries(),
        gain_evaluations: oracle.gain_evaluations(),
        offdiagonal_count: oracle.offdiagonal_count(),
        offdiagonals: oracle.offdiagonal_log().to_vec(),
    }
}

/// Completed-run result for the single-shot drivers.
pub(crate) fn completed_run<M: KernelView, O: LogDetOracle>(
    timer: &Timer,
    matrix: &M,
    oracle: &O,
) -> RunResult {
    RunResult {
        finished: true,
        solution: oracle.solution().to_vec(),
        value: oracle.value(),
        measurement: measure(timer.elapsed(), matrix, oracle),
    }
}
