//! Per-step measurements and result containers.

/// Counter snapshot taken after a greedy step.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurement {
    /// Seconds since the driver started.
    pub time: f64,
    /// Kernel entries materialized so far (0 for dense views).
    pub computed_entries: usize,
    /// From-scratch gain evaluations so far (Direct oracle).
    pub gain_evaluations: usize,
    /// Factor off-diagonals filled so far (Fast oracle).
    pub offdiagonal_count: usize,
    /// Logged `(element, committed)` fill positions, when enabled.
    pub offdiagonals: Vec<(usize, usize)>,
}

/// Outcome of one algorithm run (or of one reconstructed prefix).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    /// False when the run hit its time limit before completing.
    pub finished: bool,
    /// Selected elements in accept order.
    pub solution: Vec<usize>,
    /// `log det L[S,S]` of the solution (`−∞` after a zero gain).
    pub value: f64,
    pub measurement: Measurement,
}

impl RunResult {
    /// Sentinel for a run cut short by the time limit.
    #[must_use]
    pub fn unfinished() -> Self {
        Self {
            finished: false,
            solution: Vec::new(),
            value: 0.0,
            measurement: Measurement::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StepRecord {
    pub element: Option<usize>,
    pub value: f64,
}

/// Result of the plain greedy driver: one snapshot per completed step,
/// plus the step-0 snapshot of the empty selection.
///
/// `snapshot(t)` reconstructs the solution of size exactly `t` from the
/// recorded per-step elements.
#[derive(Debug, Clone)]
pub struct GreedyResult {
    pub finished: bool,
    steps: Vec<StepRecord>,
    measurements: Vec<Measurement>,
}

impl GreedyResult {
    pub(crate) fn with_capacity(k: usize) -> Self {
        let mut result = Self {
            finished: false,
            steps: Vec::with_capacity(k + 1),
            measurements: Vec::with_capacity(k + 1),
        };
        result.record(None, 0.0, Measurement::default());
        result
    }

    pub(crate) fn record(&mut self, element: Option<usize>, value: f64, measurement: Measurement) {
        self.steps.push(StepRecord { element, value });
        self.measurements.push(measurement);
    }

    /// Number of recorded snapshots (completed steps + 1).
    #[must_use]
    pub fn snapshots(&self) -> usize {
        self.steps.len()
    }

    /// Snapshot after the last completed step.
    #[must_use]
    pub fn last(&self) -> RunResult {
        self.snapshot(self.snapshots() - 1)
    }

    /// The state after step `t`: solution prefix of size `t`, its value,
    /// and the counters at that step. Out-of-range `t` yields the
    /// unfinished sentinel. The off-diagonal log is the concatenation
    /// over all recorded steps.
    #[must_use]
    pub fn snapshot(&self, t: usize) -> RunResult {
        if t >= self.snapshots() {
            return RunResult::unfinished();
        }

        let solution: Vec<usize> = self.steps[1..=t]
            .iter()
            .filter_map(|step| {
                debug_assert!(step.element.is_some());
                step.element
            })
            .collect();

        let mut measurement = self.measurements[t].clone();
        measurement.offdiagonals = self
            .measurements
            .iter()
            .flat_map(|m| m.offdiagonals.iter().copied())
            .collect();

        RunResult {
            finished: true,
            solution,
            value: self.steps[t].value,
            measurement,
        }
    }
}

/// One step of one interlace chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ChainStep {
    pub element: Option<usize>,
    pub value: f64,
}

/// Result of the interlace driver: per round, the element and value of
/// each of the four chains.
///
/// Chain values are monotone non-decreasing, so the best prefix of the
/// winning chain is found by binary search over its recorded values.
#[derive(Debug, Clone)]
pub struct InterlaceResult {
    pub finished: bool,
    rounds: Vec<[ChainStep; 4]>,
    measurements: Vec<Measurement>,
}

impl InterlaceResult {
    pub(crate) fn with_capacity(k: usize) -> Self {
        let mut result = Self {
            finished: false,
            rounds: Vec::with_capacity(k + 1),
            measurements: Vec::with_capacity(k + 1),
        };
        let empty = ChainStep {
            element: None,
            value: 0.0,
        };
        result.record([empty; 4], Measurement::default());
        result
    }

    pub(crate) fn record(&mut self, round: [ChainStep; 4], measurement: Measurement) {
        self.rounds.push(round);
        self.measurements.push(measurement);
    }

    /// Number of recorded rounds (completed rounds + 1).
    #[must_use]
    pub fn snapshots(&self) -> usize {
        self.rounds.len()
    }

    /// Snapshot after the last completed round.
    #[must_use]
    pub fn last(&self) -> RunResult {
        self.snapshot(self.snapshots() - 1)
    }

    /// Best chain state after round `t`: among the four chains, take the
    /// one with the largest value at round `t` (shorter prefix wins
    /// ties), cut at the step where that value was first reached.
    #[must_use]
    pub fn snapshot(&self, t: usize) -> RunResult {
        if t >= self.snapshots() {
            return RunResult::unfinished();
        }

        let (chain, prefix, value) = self.best_chain(t);
        let solution: Vec<usize> = self.rounds[1..=prefix]
            .iter()
            .filter_map(|round| {
                debug_assert!(round[chain].element.is_some());
                round[chain].element
            })
            .collect();

        RunResult {
            finished: true,
            solution,
            value,
            measurement: self.measurements[t].clone(),
        }
    }

    fn best_chain(&self, t: usize) -> (usize, usize, f64) {
        debug_assert!(t < self.snapshots());

        // First round where each chain reached its round-t value.
        let reached = |chain: usize| {
            let value = self.rounds[t][chain].value;
            let prefix = self.rounds[..t].partition_point(|round| round[chain].value < value);
            (chain, prefix, value)
        };

        let mut best = reached(0);
        for chain in 1..4 {
            let (_, prefix, value) = reached(chain);
            // Larger value wins; on equal values the shorter prefix.
            if value > best.2 || (value == best.2 && prefix < best.1) {
                best = (chain, prefix, value);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greedy_snapshot_reconstructs_prefixes() {
        let mut result = GreedyResult::with_capacity(2);
        result.record(Some(7), 1.0, Measurement::default());
        result.record(Some(2), 1.5, Measurement::default());
        result.finished = true;

        assert_eq!(result.snapshot(0).solution, Vec::<usize>::new());
        assert_eq!(result.snapshot(1).solution, vec![7]);
        assert_eq!(result.snapshot(2).solution, vec![7, 2]);
        assert!((result.snapshot(2).value - 1.5).abs() < 1e-12);
        assert_eq!(result.last().solution, vec![7, 2]);
    }

    #[test]
    fn greedy_snapshot_out_of_range_is_unfinished() {
        let result = GreedyResult::with_capacity(0);
        let miss = result.snapshot(3);
        assert!(!miss.finished);
        assert!(miss.solution.is_empty());
    }

    #[test]
    fn interlace_snapshot_picks_best_chain_prefix() {
        let mut result = InterlaceResult::with_capacity(2);
        let none = ChainStep {
            element: None,
            value: 0.0,
        };
        // Round 1: chain 0 takes element 4 (value 2.0), chain 2 takes 1 (1.0).
        result.record(
            [
                ChainStep {
                    element: Some(4),
                    value: 2.0,
                },
                none,
                ChainStep {
                    element: Some(1),
                    value: 1.0,
                },
                none,
            ],
            Measurement::default(),
        );
        // Round 2: chain 2 overtakes with value 3.0; chain 0 stalls.
        result.record(
            [
                ChainStep {
                    element: None,
                    value: 2.0,
                },
                none,
                ChainStep {
                    element: Some(5),
                    value: 3.0,
                },
                none,
            ],
            Measurement::default(),
        );

        let after_one = result.snapshot(1);
        assert_eq!(after_one.solution, vec![4]);
        assert!((after_one.value - 2.0).abs() < 1e-12);

        let after_two = result.snapshot(2);
        assert_eq!(after_two.solution, vec![1, 5]);
        assert!((after_two.value - 3.0).abs() < 1e-12);
    }

    #[test]
    fn interlace_ties_prefer_the_shorter_prefix() {
        let mut result = InterlaceResult::with_capacity(2);
        let none = ChainStep {
            element: None,
            value: 0.0,
        };
        // Chain 0 reaches value 1.0 in one round, chain 1 needs two.
        result.record(
            [
                ChainStep {
                    element: Some(2),
                    value: 1.0,
                },
                none,
                none,
                none,
            ],
            Measurement::default(),
        );
        result.record(
            [
                ChainStep {
                    element: None,
                    value: 1.0,
                },
                ChainStep {
                    element: Some(3),
                    value: 1.0,
                },
                none,
                none,
            ],
            Measurement::default(),
        );

        let snap = result.snapshot(2);
        assert_eq!(snap.solution, vec![2]);
        assert!((snap.value - 1.0).abs() < 1e-12);
    }
}
